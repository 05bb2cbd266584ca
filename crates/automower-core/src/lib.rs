//! Status normalization, device adapters and polling for Husqvarna
//! Automower robots.
//!
//! This crate sits between `automower-api` and a host (the `automower`
//! CLI, or any embedding home-automation hub):
//!
//! - **[`Mower`]**: Device adapter for one robot. Fetches snapshots,
//!   reconciles the sticky display status, and issues guarded control
//!   verbs (`turn_on`, `turn_off`, `start_pause`, `return_to_base`).
//!
//! - **[`StatusTracker`]**: The display status state machine. A control
//!   command puts it into a pending transition that survives polls until
//!   the vendor's `storedTimestamp` changes.
//!
//! - **[`normalize_attributes`]**: Key-sorted, filtered attribute view
//!   of a raw snapshot with timestamps converted to UTC.
//!
//! - **[`MowerRegistry`]**: Explicit per-account collection, built by
//!   [`connect()`] or [`MowerRegistry::discover`]. [`poller::run`] drives
//!   it on an interval.
//!
//! - **Host seams**: [`MowerApi`] / [`MowerAccount`] for the vendor side,
//!   [`LocationSink`] for device trackers.

pub mod api;
pub mod attributes;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod mower;
pub mod normalize;
pub mod poller;
pub mod registry;
pub mod tracker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{MowerAccount, MowerApi};
pub use attributes::{AttributeValue, Attributes, normalize_attributes, normalize_timestamp};
pub use config::HubConfig;
pub use error::CoreError;
pub use model::{
    Location, MowerIdentity, MowerSnapshot, MowerState, MowerStatus, SupportedFeatures,
};
pub use mower::{CommandOutcome, Mower, MowerSettings, PollOutcome};
pub use normalize::{DisplayState, Freshness, StatusTracker, Transition};
pub use registry::{Hub, MowerRegistry, PollReport, connect};
pub use tracker::{LocationSink, LocationUpdate, TrackerAttributes};

// Vendor types that appear in this crate's public API.
pub use automower_api::{ControlCommand, Endpoints, RawStatus, RobotClient, RobotInfo};
