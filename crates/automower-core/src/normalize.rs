// ── Display status reconciliation ──
//
// The display status is sticky. A control command puts it into a
// pending transition (`EXECUTING_*`) which survives every poll until the
// vendor's `storedTimestamp` changes; only then is the vendor status
// adopted again.

use serde::Serialize;
use strum::{Display, EnumIter};

use automower_api::ControlCommand;

use crate::model::{MowerSnapshot, MowerStatus};

/// Locally issued transition following a control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Transition {
    Starting,
    Stopping,
    Parking,
}

impl Transition {
    /// The local status code shown while the transition is pending.
    pub fn status(self) -> MowerStatus {
        match self {
            Self::Starting => MowerStatus::ExecutingStart,
            Self::Stopping => MowerStatus::ExecutingStop,
            Self::Parking => MowerStatus::ExecutingPark,
        }
    }

    /// The vendor verb that triggers this transition.
    pub fn command(self) -> ControlCommand {
        match self {
            Self::Starting => ControlCommand::Start,
            Self::Stopping => ControlCommand::Stop,
            Self::Parking => ControlCommand::Park,
        }
    }
}

/// What the mower currently shows to the outside world.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DisplayState {
    /// Never polled, no command issued.
    #[default]
    Unset,
    /// Vendor status adopted from a fresh snapshot.
    Reported(MowerStatus),
    /// A command was accepted; waiting for the vendor to catch up.
    Pending(Transition),
}

impl DisplayState {
    pub fn status(&self) -> Option<MowerStatus> {
        match self {
            Self::Unset => None,
            Self::Reported(status) => Some(status.clone()),
            Self::Pending(transition) => Some(transition.status()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status().as_ref().is_some_and(MowerStatus::is_active)
    }
}

/// How a snapshot related to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Freshness {
    /// First snapshot seen; adopted unconditionally.
    First,
    /// `storedTimestamp` changed; vendor status adopted.
    Fresh,
    /// Same `storedTimestamp` as last time; display state kept.
    Stale,
}

/// Owns the display state and the last adopted `storedTimestamp`.
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    state: DisplayState,
    stored_timestamp: Option<i64>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(&mut self, snapshot: &MowerSnapshot) -> Freshness {
        let incoming = snapshot.stored_timestamp();
        let freshness = match self.stored_timestamp {
            None => Freshness::First,
            Some(seen) if seen == incoming => return Freshness::Stale,
            Some(_) => Freshness::Fresh,
        };

        self.state = DisplayState::Reported(snapshot.status().clone());
        self.stored_timestamp = Some(incoming);
        freshness
    }

    /// Enter a pending transition. The cached timestamp is left alone so
    /// the next stale poll keeps the transition visible.
    pub fn begin(&mut self, transition: Transition) {
        self.state = DisplayState::Pending(transition);
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn status(&self) -> Option<MowerStatus> {
        self.state.status()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn stored_timestamp(&self) -> Option<i64> {
        self.stored_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn snapshot(status: &str, stored: i64) -> MowerSnapshot {
        let serde_json::Value::Object(raw) = json!({
            "mowerStatus": status,
            "storedTimestamp": stored,
            "batteryPercent": 50,
            "lastErrorCode": 0,
            "nextStartSource": "NO_SOURCE",
            "lastLocations": []
        }) else {
            unreachable!()
        };
        MowerSnapshot::from_raw(raw).expect("valid snapshot")
    }

    #[test]
    fn first_poll_adopts() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.status(), None);
        assert_eq!(tracker.reconcile(&snapshot("PARKED_TIMER", 100)), Freshness::First);
        assert_eq!(tracker.state(), &DisplayState::Reported(MowerStatus::ParkedTimer));
        assert_eq!(tracker.stored_timestamp(), Some(100));
    }

    #[test]
    fn stale_polls_keep_pending_transition() {
        let mut tracker = StatusTracker::new();
        tracker.reconcile(&snapshot("PARKED_TIMER", 100));
        tracker.begin(Transition::Starting);

        for _ in 0..3 {
            assert_eq!(tracker.reconcile(&snapshot("PARKED_TIMER", 100)), Freshness::Stale);
            assert_eq!(tracker.status(), Some(MowerStatus::ExecutingStart));
        }

        assert_eq!(tracker.reconcile(&snapshot("OK_LEAVING", 160)), Freshness::Fresh);
        assert_eq!(tracker.status(), Some(MowerStatus::OkLeaving));
    }

    #[test]
    fn stale_polls_ignore_vendor_status() {
        let mut tracker = StatusTracker::new();
        tracker.reconcile(&snapshot("OK_CUTTING", 100));
        tracker.reconcile(&snapshot("ERROR", 100));
        assert_eq!(tracker.status(), Some(MowerStatus::OkCutting));
    }

    #[test]
    fn any_timestamp_change_is_adopted() {
        let mut tracker = StatusTracker::new();
        tracker.reconcile(&snapshot("OK_CUTTING", 200));
        assert_eq!(tracker.reconcile(&snapshot("PAUSED", 150)), Freshness::Fresh);
        assert_eq!(tracker.status(), Some(MowerStatus::Paused));
    }

    #[test]
    fn begin_before_first_poll() {
        let mut tracker = StatusTracker::new();
        tracker.begin(Transition::Parking);
        assert_eq!(tracker.stored_timestamp(), None);
        assert_eq!(tracker.reconcile(&snapshot("PARKED_PARKED_SELECTED", 5)), Freshness::First);
        assert_eq!(tracker.status(), Some(MowerStatus::ParkedSelected));
    }

    #[test]
    fn transitions_map_to_local_codes() {
        let codes: Vec<_> = Transition::iter().map(|t| t.status().to_string()).collect();
        assert_eq!(codes, ["EXECUTING_START", "EXECUTING_STOP", "EXECUTING_PARK"]);
        assert_eq!(Transition::Parking.command(), ControlCommand::Park);
        assert!(DisplayState::Pending(Transition::Starting).is_active());
        assert!(!DisplayState::Pending(Transition::Stopping).is_active());
        assert!(!DisplayState::Unset.is_active());
    }
}
