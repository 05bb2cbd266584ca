//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use automower_config::ConfigError;
use automower_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const DATA: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Automower Connect service: {reason}")]
    #[diagnostic(
        code(automower::connection_failed),
        help("Check your network connection and try again.")
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(automower::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(automower::auth_failed),
        help(
            "Verify your account e-mail and password.\n\
             Run: automower config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(automower::no_credentials),
        help(
            "Configure credentials with: automower config init\n\
             Or set AUTOMOWER_USERNAME and AUTOMOWER_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Mowers ───────────────────────────────────────────────────────
    #[error("No mowers are registered to this account")]
    #[diagnostic(
        code(automower::no_devices),
        help("Pair a mower with the Automower Connect app first.")
    )]
    NoDevices,

    #[error("Mower '{identifier}' not found")]
    #[diagnostic(
        code(automower::not_found),
        help("Run: automower list to see available mowers")
    )]
    NotFound { identifier: String },

    #[error("{command} command rejected: {message}")]
    #[diagnostic(code(automower::command_rejected))]
    CommandRejected { command: String, message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(automower::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected data from the mower service ({field}): {reason}")]
    #[diagnostic(
        code(automower::data_shape),
        help("The service returned a payload this version does not understand.")
    )]
    DataShape { field: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(automower::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(automower::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: automower config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(automower::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(automower::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NoDevices | Self::NotFound { .. } | Self::ProfileNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::DataShape { .. } => exit_code::DATA,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NoDevices => CliError::NoDevices,
            CoreError::Transient { message } => CliError::ConnectionFailed { reason: message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::DataShape { field, reason } => CliError::DataShape { field, reason },
            CoreError::CommandRejected { command, message } => {
                CliError::CommandRejected { command, message }
            }
            CoreError::MowerNotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Api { status, message } => CliError::ApiError { status, message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => {
                let available = automower_config::load_config_or_default()
                    .profiles
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>();
                CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                }
            }
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::AuthenticationFailed {
                    message: "bad password".into(),
                },
                exit_code::AUTH,
            ),
            (CoreError::NoDevices, exit_code::NOT_FOUND),
            (
                CoreError::Transient {
                    message: "connection refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 5 }, exit_code::TIMEOUT),
            (
                CoreError::DataShape {
                    field: "batteryPercent".into(),
                    reason: "missing".into(),
                },
                exit_code::DATA,
            ),
            (
                CoreError::MowerNotFound {
                    identifier: "back yard".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::CommandRejected {
                    command: "PARK".into(),
                    message: "HTTP 500".into(),
                },
                exit_code::GENERAL,
            ),
        ];

        for (core, code) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), code, "{label}");
        }
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
