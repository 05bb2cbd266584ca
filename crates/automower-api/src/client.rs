// AMC account client
//
// Wraps `reqwest::Client` with endpoint construction, session handling,
// and response decoding. Robot-scoped calls live on `RobotClient`,
// which this client constructs after login.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{Endpoints, Session, join, preview};
use crate::error::Error;
use crate::models::RobotInfo;
use crate::robot::RobotClient;
use crate::transport::TransportConfig;

/// Account-level client for the AMC cloud API.
///
/// Handles login and robot discovery. Each mower is then driven through
/// its own [`RobotClient`], built from the authenticated session by
/// [`select_robot`](Self::select_robot).
#[derive(Debug)]
pub struct AmcClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    transport: TransportConfig,
    session: Option<Session>,
}

impl AmcClient {
    /// Create an unauthenticated client.
    pub fn new(endpoints: Endpoints, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoints, transport.clone()))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoints: Endpoints,
        transport: TransportConfig,
    ) -> Self {
        Self {
            http,
            endpoints,
            transport,
            session: None,
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// `true` once [`login`](Self::login) has succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub(crate) fn take_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    fn session(&self) -> Result<&Session, Error> {
        self.session.as_ref().ok_or(Error::NotAuthenticated)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List the mowers registered to the account.
    ///
    /// `GET {api_url}/mowers`
    pub async fn list_robots(&self) -> Result<Vec<RobotInfo>, Error> {
        let session = self.session()?;
        let url = join(&self.endpoints.api_url, "mowers")?;
        debug!("GET {}", url);

        let resp = session
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.transport.send_error(e))?;
        decode(resp).await
    }

    /// Build an independent client bound to one mower.
    ///
    /// The returned handle carries its own copy of the session token and
    /// shares only the connection pool with this client.
    pub fn select_robot(&self, robot_id: &str) -> Result<RobotClient, Error> {
        let session = self.session()?.clone();
        debug!(robot_id, "selecting robot");
        Ok(RobotClient::new(
            self.http.clone(),
            self.endpoints.api_url.clone(),
            self.transport.clone(),
            session,
            robot_id.to_owned(),
        ))
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Fail on non-success status codes, mapping 401/403 to authentication
/// errors.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: format!("token rejected (HTTP {status})"),
        });
    }

    Err(Error::Api {
        status: status.as_u16(),
        message: preview(&body).to_owned(),
    })
}

/// Check the status and decode the JSON body.
pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let resp = check_status(resp).await?;
    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_robot_requires_login() {
        let client = AmcClient::with_client(
            reqwest::Client::new(),
            Endpoints::default(),
            TransportConfig::default(),
        );
        assert!(!client.is_authenticated());
        assert!(matches!(
            client.select_robot("123"),
            Err(Error::NotAuthenticated)
        ));
    }
}
