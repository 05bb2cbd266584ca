// ── Device adapter ──
//
// One `Mower` per robot on the account. It owns its vendor handle, the
// latest validated snapshot, and the sticky display status. The host
// serializes calls per mower, so everything here takes `&mut self` and
// no locking is needed.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::api::MowerApi;
use crate::attributes::{Attributes, normalize_attributes};
use crate::catalog;
use crate::config::DEFAULT_TIMEOUT;
use crate::error::CoreError;
use crate::model::{
    Location, MowerIdentity, MowerSnapshot, MowerState, MowerStatus, SupportedFeatures,
};
use crate::normalize::{Freshness, StatusTracker, Transition};
use crate::tracker::{LocationSink, LocationUpdate, TrackerAttributes};

/// Per-mower tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MowerSettings {
    /// Upper bound on a single status fetch or control call.
    pub poll_timeout: Duration,
}

impl Default for MowerSettings {
    fn default() -> Self {
        Self {
            poll_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Result of a control operation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CommandOutcome {
    /// The vendor accepted the command.
    Sent,
    /// The mower was already in the target state; nothing was sent.
    Skipped,
}

/// Result of a poll that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PollOutcome {
    /// New snapshot adopted (first poll, or `storedTimestamp` changed).
    Updated,
    /// Snapshot cached but display status kept.
    Stale,
    /// Transient failure; nothing changed.
    Skipped,
}

pub struct Mower<A> {
    identity: MowerIdentity,
    api: A,
    settings: MowerSettings,
    tracker: StatusTracker,
    snapshot: Option<MowerSnapshot>,
    sink: Option<Arc<dyn LocationSink>>,
}

impl<A> fmt::Debug for Mower<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mower")
            .field("identity", &self.identity)
            .field("settings", &self.settings)
            .field("tracker", &self.tracker)
            .field("snapshot", &self.snapshot)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl<A: MowerApi> Mower<A> {
    pub fn new(identity: MowerIdentity, api: A, settings: MowerSettings) -> Self {
        debug!(mower = %identity.name, id = %identity.id, "initializing mower");
        Self {
            identity,
            api,
            settings,
            tracker: StatusTracker::new(),
            snapshot: None,
            sink: None,
        }
    }

    pub fn set_location_sink(&mut self, sink: Arc<dyn LocationSink>) {
        self.sink = Some(sink);
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// Fetch a fresh snapshot and reconcile the display status.
    ///
    /// Network failures and timeouts are logged and reported as
    /// [`PollOutcome::Skipped`], leaving the cached state as it was.
    /// Malformed payloads and authentication failures are returned.
    pub async fn update(&mut self) -> Result<PollOutcome, CoreError> {
        debug!(mower = %self.identity.name, "fetching state from API");

        let raw = match timeout(self.settings.poll_timeout, self.api.status()).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                let err = CoreError::from(e);
                if !err.is_transient() {
                    return Err(err);
                }
                warn!(mower = %self.identity.name, error = %err, "status fetch failed, keeping last state");
                return Ok(PollOutcome::Skipped);
            }
            Err(_) => {
                warn!(
                    mower = %self.identity.name,
                    timeout_secs = self.settings.poll_timeout.as_secs(),
                    "status fetch timed out, keeping last state"
                );
                return Ok(PollOutcome::Skipped);
            }
        };

        let snapshot = MowerSnapshot::from_raw(raw)?;
        let freshness = self.tracker.reconcile(&snapshot);
        debug!(
            mower = %self.identity.name,
            stored_timestamp = snapshot.stored_timestamp(),
            %freshness,
            "reconciled status"
        );
        self.snapshot = Some(snapshot);

        if let Some(sink) = &self.sink {
            let update = self.location_update()?;
            debug!(mower = %self.identity.name, "updating device tracker");
            sink.see(update);
        }

        Ok(match freshness {
            Freshness::Stale => PollOutcome::Stale,
            Freshness::First | Freshness::Fresh => PollOutcome::Updated,
        })
    }

    // ── Control ──────────────────────────────────────────────────────

    /// Start mowing unless already active.
    pub async fn turn_on(&mut self) -> Result<CommandOutcome, CoreError> {
        if self.is_on() {
            debug!(mower = %self.identity.name, "already active, not sending START");
            return Ok(CommandOutcome::Skipped);
        }
        self.send(Transition::Starting).await
    }

    /// Stop mowing unless already inactive.
    pub async fn turn_off(&mut self) -> Result<CommandOutcome, CoreError> {
        if !self.is_on() {
            debug!(mower = %self.identity.name, "not active, not sending STOP");
            return Ok(CommandOutcome::Skipped);
        }
        self.send(Transition::Stopping).await
    }

    /// Alias for [`turn_off`](Self::turn_off).
    pub async fn stop(&mut self) -> Result<CommandOutcome, CoreError> {
        self.turn_off().await
    }

    /// Toggle between mowing and stopped.
    pub async fn start_pause(&mut self) -> Result<CommandOutcome, CoreError> {
        if self.is_on() {
            self.turn_off().await
        } else {
            self.turn_on().await
        }
    }

    /// Park. Always sent, parking an already parked mower is harmless.
    pub async fn return_to_base(&mut self) -> Result<CommandOutcome, CoreError> {
        self.send(Transition::Parking).await
    }

    async fn send(&mut self, transition: Transition) -> Result<CommandOutcome, CoreError> {
        let command = transition.command();
        debug!(mower = %self.identity.name, %command, "sending command");

        let rejected = |message: String| CoreError::CommandRejected {
            command: command.to_string(),
            message,
        };

        match timeout(self.settings.poll_timeout, self.api.control(command)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(rejected(e.to_string())),
            Err(_) => {
                return Err(rejected(format!(
                    "no response within {}s",
                    self.settings.poll_timeout.as_secs()
                )));
            }
        }

        self.tracker.begin(transition);
        Ok(CommandOutcome::Sent)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn identity(&self) -> &MowerIdentity {
        &self.identity
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Vendor id.
    pub fn unique_id(&self) -> &str {
        &self.identity.id
    }

    pub fn dev_id(&self) -> String {
        self.identity.dev_id()
    }

    /// Marketing model name.
    pub fn model(&self) -> &str {
        self.identity.model_name()
    }

    pub fn snapshot(&self) -> Option<&MowerSnapshot> {
        self.snapshot.as_ref()
    }

    /// Display status code, including pending `EXECUTING_*` codes.
    pub fn display_status(&self) -> Option<MowerStatus> {
        self.tracker.status()
    }

    pub fn icon(&self) -> &'static str {
        catalog::icon(self.display_status().as_ref())
    }

    /// Human status text.
    pub fn status(&self) -> Option<String> {
        self.display_status()
            .map(|status| catalog::status_text(&status).into_owned())
    }

    /// Same as [`status`](Self::status).
    pub fn state(&self) -> Option<String> {
        self.status()
    }

    pub fn battery_level(&self) -> Option<u8> {
        self.snapshot.as_ref().map(MowerSnapshot::battery_percent)
    }

    pub fn position(&self) -> Result<Location, CoreError> {
        self.snapshot
            .as_ref()
            .ok_or_else(|| CoreError::data_shape("lastLocations", "no snapshot fetched yet"))?
            .position()
    }

    pub fn latitude(&self) -> Result<f64, CoreError> {
        self.position().map(|loc| loc.latitude)
    }

    pub fn longitude(&self) -> Result<f64, CoreError> {
        self.position().map(|loc| loc.longitude)
    }

    pub fn is_on(&self) -> bool {
        self.tracker.is_active()
    }

    pub fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::MOWER
    }

    /// Cloud mowers never push, they are always polled.
    pub fn should_poll(&self) -> bool {
        true
    }

    /// Key-sorted display attributes; empty before the first poll.
    pub fn attributes(&self) -> Result<Attributes, CoreError> {
        self.snapshot
            .as_ref()
            .map_or_else(|| Ok(Attributes::new()), |s| normalize_attributes(s.raw()))
    }

    /// Position report for the device tracker.
    pub fn location_update(&self) -> Result<LocationUpdate, CoreError> {
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or_else(|| CoreError::data_shape("status", "no snapshot fetched yet"))?;
        let position = snapshot.position()?;
        let dev_id = self.dev_id();

        Ok(LocationUpdate {
            dev_id: dev_id.clone(),
            host_name: self.identity.name.clone(),
            battery: snapshot.battery_percent(),
            gps: (position.latitude, position.longitude),
            attributes: TrackerAttributes {
                status: self.status(),
                id: dev_id,
                name: self.identity.name.clone(),
                icon: self.icon().to_owned(),
                vendor: catalog::VENDOR.to_owned(),
                model: self.model().to_owned(),
            },
        })
    }

    /// Everything the host renders, bundled.
    pub fn entity_state(&self) -> Result<MowerState, CoreError> {
        let status_code = self.display_status().map(|s| s.code().to_owned());
        Ok(MowerState {
            name: self.identity.name.clone(),
            unique_id: self.identity.id.clone(),
            dev_id: self.dev_id(),
            model: self.model().to_owned(),
            icon: self.icon().to_owned(),
            status_code,
            status: self.status(),
            battery_level: self.battery_level(),
            is_on: self.is_on(),
            position: self.position().ok(),
            supported_features: self.supported_features(),
            should_poll: self.should_poll(),
            attributes: self.attributes()?,
        })
    }

    pub fn status_or_unknown(&self) -> Cow<'static, str> {
        self.status().map_or(Cow::Borrowed(catalog::UNKNOWN_STATUS), Cow::Owned)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use automower_api::{ControlCommand, Error, RawStatus};
    use serde_json::json;

    use super::*;

    /// Serves a fixed payload and records control calls.
    #[derive(Default)]
    struct Fixed {
        payload: Mutex<Option<RawStatus>>,
        sent: Mutex<Vec<ControlCommand>>,
    }

    impl MowerApi for Fixed {
        async fn status(&self) -> Result<RawStatus, Error> {
            self.payload
                .lock()
                .unwrap()
                .clone()
                .ok_or(Error::Timeout { timeout_secs: 1 })
        }

        async fn control(&self, command: ControlCommand) -> Result<(), Error> {
            self.sent.lock().unwrap().push(command);
            Ok(())
        }
    }

    fn mower(payload: serde_json::Value) -> Mower<Fixed> {
        let serde_json::Value::Object(raw) = payload else {
            unreachable!()
        };
        let api = Fixed {
            payload: Mutex::new(Some(raw)),
            ..Fixed::default()
        };
        Mower::new(
            MowerIdentity::new("171300123-171300456", "Lawnie", "G"),
            api,
            MowerSettings::default(),
        )
    }

    #[tokio::test]
    async fn unpolled_mower_has_defaults() {
        let m = mower(json!({}));
        assert_eq!(m.status(), None);
        assert_eq!(m.icon(), catalog::DEFAULT_ICON);
        assert_eq!(m.battery_level(), None);
        assert!(m.position().is_err());
        assert!(m.attributes().unwrap().is_empty());
        assert_eq!(m.status_or_unknown(), "Unknown");
    }

    #[tokio::test]
    async fn accessors_after_poll() {
        let mut m = mower(json!({
            "mowerStatus": "OK_CHARGING",
            "storedTimestamp": 100,
            "batteryPercent": 42,
            "lastErrorCode": 0,
            "nextStartSource": "NO_SOURCE",
            "lastLocations": [{ "latitude": 57.7, "longitude": 14.1 }]
        }));
        assert_eq!(m.update().await.unwrap(), PollOutcome::Updated);

        assert_eq!(m.model(), "Automower 430X");
        assert_eq!(m.dev_id(), "automower_g_171300123_171300456");
        assert_eq!(m.icon(), "mdi:power-plug");
        assert_eq!(m.state().as_deref(), Some("Charging"));
        assert_eq!(
            m.position().unwrap(),
            Location {
                latitude: 57.7,
                longitude: 14.1
            }
        );
        assert!(m.latitude().is_ok() && m.longitude().is_ok());
        assert!(m.is_on());
        assert!(m.should_poll());
        assert_eq!(m.supported_features().bits(), 223);

        let state = m.entity_state().unwrap();
        assert_eq!(state.status_code.as_deref(), Some("OK_CHARGING"));
        assert_eq!(state.battery_level, Some(42));
    }

    #[tokio::test]
    async fn transient_failure_keeps_state() {
        let mut m = mower(json!({
            "mowerStatus": "PAUSED",
            "storedTimestamp": 100,
            "batteryPercent": 42,
            "lastErrorCode": 0,
            "nextStartSource": "NO_SOURCE",
            "lastLocations": []
        }));
        m.update().await.unwrap();
        *m.api().payload.lock().unwrap() = None;

        assert_eq!(m.update().await.unwrap(), PollOutcome::Skipped);
        assert_eq!(m.display_status(), Some(MowerStatus::Paused));
        assert_eq!(m.battery_level(), Some(42));
    }
}
