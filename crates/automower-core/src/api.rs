// ── Vendor client seams ──
//
// The adapter and registry talk to the vendor through these two traits.
// `automower_api` implements them for the real HTTP client; tests plug
// in recording fakes.

use std::future::Future;

use automower_api::{AmcClient, ControlCommand, Error, RawStatus, RobotClient, RobotInfo};

/// Per-mower vendor handle: one snapshot fetch, one control verb.
pub trait MowerApi: Send + Sync {
    fn status(&self) -> impl Future<Output = Result<RawStatus, Error>> + Send;

    fn control(&self, command: ControlCommand) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Authenticated account that can enumerate mowers and build a handle
/// for each one.
pub trait MowerAccount: Send + Sync {
    type Robot: MowerApi;

    fn list_robots(&self) -> impl Future<Output = Result<Vec<RobotInfo>, Error>> + Send;

    /// Build an independent handle bound to `robot`.
    fn select_robot(&self, robot: &RobotInfo) -> Result<Self::Robot, Error>;
}

impl MowerApi for RobotClient {
    fn status(&self) -> impl Future<Output = Result<RawStatus, Error>> + Send {
        RobotClient::status(self)
    }

    fn control(&self, command: ControlCommand) -> impl Future<Output = Result<(), Error>> + Send {
        RobotClient::control(self, command)
    }
}

impl MowerAccount for AmcClient {
    type Robot = RobotClient;

    fn list_robots(&self) -> impl Future<Output = Result<Vec<RobotInfo>, Error>> + Send {
        AmcClient::list_robots(self)
    }

    fn select_robot(&self, robot: &RobotInfo) -> Result<RobotClient, Error> {
        AmcClient::select_robot(self, &robot.id)
    }
}
