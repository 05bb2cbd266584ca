// Shared transport configuration for building reqwest::Client instances.
//
// The account client and every per-robot client share one connection
// pool; this module owns the builder logic and the mapping of send
// failures into crate errors.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("automower/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for a single request, connect through body.
    pub timeout: Duration,
    /// Upper bound for establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Config with the given request timeout and the default connect timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Self::default().connect_timeout),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Map a `send()` failure, turning reqwest's timeout into [`Error::Timeout`].
    pub(crate) fn send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TransportConfig;

    #[test]
    fn connect_timeout_never_exceeds_request_timeout() {
        let cfg = TransportConfig::with_timeout(Duration::from_secs(3));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(3));

        let cfg = TransportConfig::with_timeout(Duration::from_secs(60));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn builds_client() {
        assert!(TransportConfig::default().build_client().is_ok());
    }
}
