// ── Entity view ──

use serde::Serialize;

use super::{Location, SupportedFeatures};
use crate::attributes::Attributes;

/// Everything the host renders for one mower, captured at one instant.
///
/// Fields that depend on a snapshot are `None` until the first
/// successful poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MowerState {
    pub name: String,
    pub unique_id: String,
    pub dev_id: String,
    pub model: String,
    pub icon: String,
    /// Display status code (`OK_CUTTING`, `EXECUTING_START`, ...).
    pub status_code: Option<String>,
    /// Human status text. The host's `state` is the same value.
    pub status: Option<String>,
    pub battery_level: Option<u8>,
    pub is_on: bool,
    pub position: Option<Location>,
    pub supported_features: SupportedFeatures,
    pub should_poll: bool,
    pub attributes: Attributes,
}
