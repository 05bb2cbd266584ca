// automower-api: Async Rust client for the Husqvarna Automower cloud (AMC) API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod robot;
pub mod transport;

pub use auth::{DEFAULT_API_URL, DEFAULT_AUTH_URL, Endpoints, Session};
pub use client::AmcClient;
pub use error::Error;
pub use models::{ControlCommand, RawStatus, RobotInfo};
pub use robot::RobotClient;
pub use transport::TransportConfig;
