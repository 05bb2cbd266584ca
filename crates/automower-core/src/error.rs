// ── Core error types ──
//
// User-facing errors from automower-core. Consumers never see HTTP
// status codes or JSON parse failures directly: the
// `From<automower_api::Error>` impl folds transport-layer errors into
// the integration's taxonomy (auth, no devices, transient, data shape,
// command rejected).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("No mowers registered to this account")]
    NoDevices,

    // ── Poll errors ──────────────────────────────────────────────────
    /// Network failure or timeout. Retried on the next poll.
    #[error("Transient fetch error: {message}")]
    Transient { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The vendor payload does not have the expected shape.
    #[error("Unexpected data from vendor API ({field}): {reason}")]
    DataShape { field: String, reason: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{command} command rejected: {message}")]
    CommandRejected { command: String, message: String },

    #[error("Mower not found: {identifier}")]
    MowerNotFound { identifier: String },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn data_shape(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataShape {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the failure should be retried on the next poll
    /// rather than reported.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<automower_api::Error> for CoreError {
    fn from(err: automower_api::Error) -> Self {
        match err {
            automower_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            // 5xx, 429 and connection failures.
            e if e.is_transient() => CoreError::Transient {
                message: e.to_string(),
            },
            automower_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            automower_api::Error::NotAuthenticated => CoreError::AuthenticationFailed {
                message: "not logged in".into(),
            },
            automower_api::Error::Api { status, message } => CoreError::Api { status, message },
            automower_api::Error::Deserialization { message, body: _ } => CoreError::DataShape {
                field: "body".into(),
                reason: message,
            },
            automower_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            automower_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            // Non-transient transport failures (redirect loops, bad bodies).
            e @ automower_api::Error::Transport(_) => CoreError::Transient {
                message: e.to_string(),
            },
        }
    }
}
