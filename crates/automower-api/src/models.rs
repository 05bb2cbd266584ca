// AMC API wire types
//
// Token login envelopes, the robot listing entry, and the control verb.
// Status snapshots are deliberately kept as a raw JSON object: the set
// of fields varies between firmware generations and the core crate
// validates the ones it relies on.

use serde::{Deserialize, Serialize};

/// Raw status snapshot as returned by `GET /mowers/{id}/status`.
pub type RawStatus = serde_json::Map<String, serde_json::Value>;

/// One entry of `GET /mowers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotInfo {
    pub id: String,
    pub name: String,
    /// Single-letter vendor model code (e.g. `"G"`).
    pub model: String,
}

/// Control verbs accepted by `POST /mowers/{id}/control`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlCommand {
    Start,
    Stop,
    Park,
}

#[derive(Debug, Serialize)]
pub(crate) struct ControlRequest {
    pub action: ControlCommand,
}

/// `{"data": {"id": "<token>", "attributes": {"provider": "..."}}}`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub data: TokenData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenData {
    pub id: String,
    pub attributes: TokenAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenAttributes {
    pub provider: String,
}
