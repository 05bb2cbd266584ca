// ── Location tracking ──

use serde::Serialize;

/// Attribute bundle pushed with every location update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerAttributes {
    /// Human status text, `None` before the first status is known.
    pub status: Option<String>,
    /// Tracker device id (same as [`LocationUpdate::dev_id`]).
    pub id: String,
    pub name: String,
    pub icon: String,
    pub vendor: String,
    pub model: String,
}

/// One position report for the host's device tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationUpdate {
    pub dev_id: String,
    pub host_name: String,
    pub battery: u8,
    /// `(latitude, longitude)`.
    pub gps: (f64, f64),
    pub attributes: TrackerAttributes,
}

/// Receiver for location updates, attached to each mower by the host.
pub trait LocationSink: Send + Sync {
    fn see(&self, update: LocationUpdate);
}

impl<F> LocationSink for F
where
    F: Fn(LocationUpdate) + Send + Sync,
{
    fn see(&self, update: LocationUpdate) {
        self(update);
    }
}
