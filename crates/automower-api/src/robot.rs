// Per-mower AMC client
//
// Status snapshots and control commands for one selected mower.

use tracing::debug;
use url::Url;

use crate::auth::{Session, join};
use crate::client::{check_status, decode};
use crate::error::Error;
use crate::models::{ControlCommand, ControlRequest, RawStatus};
use crate::transport::TransportConfig;

/// Client bound to a single mower.
///
/// Built by [`AmcClient::select_robot`](crate::AmcClient::select_robot).
/// Owns its session copy, so handles for different mowers never share
/// mutable state.
#[derive(Debug, Clone)]
pub struct RobotClient {
    http: reqwest::Client,
    api_url: Url,
    transport: TransportConfig,
    session: Session,
    robot_id: String,
}

impl RobotClient {
    pub(crate) fn new(
        http: reqwest::Client,
        api_url: Url,
        transport: TransportConfig,
        session: Session,
        robot_id: String,
    ) -> Self {
        Self {
            http,
            api_url,
            transport,
            session,
            robot_id,
        }
    }

    /// The vendor id of the mower this client is bound to.
    pub fn robot_id(&self) -> &str {
        &self.robot_id
    }

    fn mower_url(&self, suffix: &str) -> Result<Url, Error> {
        join(&self.api_url, &format!("mowers/{}/{suffix}", self.robot_id))
    }

    /// Fetch the current status snapshot.
    ///
    /// `GET {api_url}/mowers/{id}/status`
    pub async fn status(&self) -> Result<RawStatus, Error> {
        let url = self.mower_url("status")?;
        debug!("GET {}", url);

        let resp = self
            .session
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.transport.send_error(e))?;
        decode(resp).await
    }

    /// Send a control command.
    ///
    /// `POST {api_url}/mowers/{id}/control` with `{"action": "START"}` etc.
    pub async fn control(&self, command: ControlCommand) -> Result<(), Error> {
        let url = self.mower_url("control")?;
        debug!(robot_id = %self.robot_id, %command, "POST {}", url);

        let resp = self
            .session
            .authorize(self.http.post(url))
            .json(&ControlRequest { action: command })
            .send()
            .await
            .map_err(|e| self.transport.send_error(e))?;
        check_status(resp).await?;
        Ok(())
    }
}
