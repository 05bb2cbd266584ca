// ── Mower registry ──
//
// The set of mowers for one account, created once at setup and owned by
// the host. Lookups accept a vendor id, a tracker dev id, or a display
// name.

use std::sync::Arc;

use automower_api::{AmcClient, RobotClient};
use tracing::{info, warn};

use crate::api::{MowerAccount, MowerApi};
use crate::config::HubConfig;
use crate::error::CoreError;
use crate::model::MowerIdentity;
use crate::mower::{Mower, MowerSettings, PollOutcome};
use crate::tracker::LocationSink;

/// Per-mower outcome of one [`MowerRegistry::poll_all`] pass. Entries
/// are display names.
#[derive(Debug, Default)]
pub struct PollReport {
    pub updated: Vec<String>,
    pub stale: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, CoreError)>,
}

impl PollReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.updated.len() + self.stale.len() + self.skipped.len() + self.failed.len()
    }
}

#[derive(Debug)]
pub struct MowerRegistry<A> {
    mowers: Vec<Mower<A>>,
}

impl<A: MowerApi> MowerRegistry<A> {
    /// List the account's robots and build one adapter per robot, each
    /// with its own vendor handle.
    pub async fn discover<C>(account: &C, settings: MowerSettings) -> Result<Self, CoreError>
    where
        C: MowerAccount<Robot = A>,
    {
        let robots = account.list_robots().await?;
        if robots.is_empty() {
            return Err(CoreError::NoDevices);
        }

        let mut mowers = Vec::with_capacity(robots.len());
        for robot in &robots {
            let api = account.select_robot(robot)?;
            mowers.push(Mower::new(MowerIdentity::from(robot), api, settings));
        }

        info!(count = mowers.len(), "discovered mowers");
        Ok(Self { mowers })
    }

    pub fn len(&self) -> usize {
        self.mowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mowers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mower<A>> {
        self.mowers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Mower<A>> {
        self.mowers.iter_mut()
    }

    /// Look up by vendor id, dev id, or case-insensitive name.
    pub fn find(&self, query: &str) -> Option<&Mower<A>> {
        let idx = self.position_of(query)?;
        self.mowers.get(idx)
    }

    pub fn find_mut(&mut self, query: &str) -> Option<&mut Mower<A>> {
        let idx = self.position_of(query)?;
        self.mowers.get_mut(idx)
    }

    /// Like [`find_mut`](Self::find_mut), but a miss is an error.
    pub fn require_mut(&mut self, query: &str) -> Result<&mut Mower<A>, CoreError> {
        self.find_mut(query).ok_or_else(|| CoreError::MowerNotFound {
            identifier: query.to_owned(),
        })
    }

    fn position_of(&self, query: &str) -> Option<usize> {
        self.mowers
            .iter()
            .position(|m| m.unique_id() == query || m.dev_id() == query)
            .or_else(|| {
                let query = query.to_lowercase();
                self.mowers
                    .iter()
                    .position(|m| m.name().to_lowercase() == query)
            })
    }

    /// Attach one sink to every mower.
    pub fn attach_location_sink(&mut self, sink: &Arc<dyn LocationSink>) {
        for mower in &mut self.mowers {
            mower.set_location_sink(Arc::clone(sink));
        }
    }

    /// Poll every mower once. A failure is recorded against that mower
    /// only; the rest are still polled.
    pub async fn poll_all(&mut self) -> PollReport {
        let mut report = PollReport::default();
        for mower in &mut self.mowers {
            let name = mower.name().to_owned();
            match mower.update().await {
                Ok(PollOutcome::Updated) => report.updated.push(name),
                Ok(PollOutcome::Stale) => report.stale.push(name),
                Ok(PollOutcome::Skipped) => report.skipped.push(name),
                Err(e) => {
                    warn!(mower = %name, error = %e, "mower update failed");
                    report.failed.push((name, e));
                }
            }
        }
        report
    }
}

// ── Setup against the real vendor API ────────────────────────────────

/// An authenticated account plus its registry.
#[derive(Debug)]
pub struct Hub {
    client: AmcClient,
    registry: MowerRegistry<RobotClient>,
}

impl Hub {
    pub fn client(&self) -> &AmcClient {
        &self.client
    }

    pub fn registry(&self) -> &MowerRegistry<RobotClient> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MowerRegistry<RobotClient> {
        &mut self.registry
    }

    /// Revoke the session token. Failure is logged, not returned: the
    /// token expires on its own.
    pub async fn disconnect(mut self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "logout failed");
        }
    }
}

/// Log in and discover every mower on the account.
pub async fn connect(config: &HubConfig) -> Result<Hub, CoreError> {
    let mut client = AmcClient::new(config.endpoints.clone(), &config.transport())?;

    info!(username = %config.username, "logging in");
    client.login(&config.username, &config.password).await?;

    let registry = MowerRegistry::discover(&client, config.settings()).await?;
    Ok(Hub { client, registry })
}
