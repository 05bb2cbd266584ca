// ── Runtime hub configuration ──
//
// Credentials and tuning for one account. Built by the CLI (or any
// embedding host) and handed in; core never reads config files.

use std::time::Duration;

use secrecy::SecretString;

use automower_api::{Endpoints, TransportConfig};

use crate::mower::MowerSettings;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct HubConfig {
    pub username: String,
    pub password: SecretString,
    /// Vendor base URLs. Tests point both at a mock server.
    pub endpoints: Endpoints,
    /// Bound on every vendor request.
    pub timeout: Duration,
    /// Poll period for long-running hosts.
    pub scan_interval: Duration,
}

impl HubConfig {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            endpoints: Endpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            scan_interval: DEFAULT_SCAN_INTERVAL,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(self.timeout)
    }

    pub fn settings(&self) -> MowerSettings {
        MowerSettings {
            poll_timeout: self.timeout,
        }
    }
}
