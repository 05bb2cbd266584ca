// ── Status snapshots ──
//
// A validated view over one raw `GET /mowers/{id}/status` payload. The
// fields the adapter depends on are checked up front; everything else
// stays in the raw map for the generic attribute view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use automower_api::RawStatus;

use super::MowerStatus;
use crate::error::CoreError;

/// One GPS fix from `lastLocations`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Point-in-time telemetry for one mower.
#[derive(Debug, Clone, PartialEq)]
pub struct MowerSnapshot {
    status: MowerStatus,
    stored_timestamp: i64,
    battery_percent: u8,
    last_error_code: i64,
    next_start_source: String,
    raw: RawStatus,
}

impl MowerSnapshot {
    /// Validate a raw payload.
    ///
    /// `mowerStatus`, `storedTimestamp`, `batteryPercent`, `lastLocations`,
    /// `lastErrorCode` and `nextStartSource` must all be present with the
    /// expected JSON type, otherwise [`CoreError::DataShape`] is returned.
    pub fn from_raw(raw: RawStatus) -> Result<Self, CoreError> {
        let status = MowerStatus::from_code(required_str(&raw, "mowerStatus")?);
        let stored_timestamp = required_i64(&raw, "storedTimestamp")?;
        let battery = required_i64(&raw, "batteryPercent")?;
        let battery_percent = u8::try_from(battery)
            .ok()
            .filter(|pct| *pct <= 100)
            .ok_or_else(|| {
                CoreError::data_shape("batteryPercent", format!("{battery} is not a percentage"))
            })?;
        if !required(&raw, "lastLocations")?.is_array() {
            return Err(CoreError::data_shape("lastLocations", "expected an array"));
        }
        let last_error_code = required_i64(&raw, "lastErrorCode")?;
        let next_start_source = required_str(&raw, "nextStartSource")?.to_owned();

        Ok(Self {
            status,
            stored_timestamp,
            battery_percent,
            last_error_code,
            next_start_source,
            raw,
        })
    }

    pub fn status(&self) -> &MowerStatus {
        &self.status
    }

    /// Vendor-side refresh marker, in seconds or milliseconds.
    pub fn stored_timestamp(&self) -> i64 {
        self.stored_timestamp
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    pub fn last_error_code(&self) -> i64 {
        self.last_error_code
    }

    pub fn next_start_source(&self) -> &str {
        &self.next_start_source
    }

    pub fn raw(&self) -> &RawStatus {
        &self.raw
    }

    /// Most recent GPS fix. A mower that has never reported a fix cannot
    /// be tracked, so an empty list is a data-shape error.
    pub fn position(&self) -> Result<Location, CoreError> {
        let first = self
            .raw
            .get("lastLocations")
            .and_then(Value::as_array)
            .and_then(|fixes| fixes.first())
            .ok_or_else(|| CoreError::data_shape("lastLocations", "no location fix reported"))?;

        let coordinate = |key: &str| {
            first.get(key).and_then(Value::as_f64).ok_or_else(|| {
                CoreError::data_shape(format!("lastLocations[0].{key}"), "expected a number")
            })
        };

        Ok(Location {
            latitude: coordinate("latitude")?,
            longitude: coordinate("longitude")?,
        })
    }
}

fn required<'a>(raw: &'a RawStatus, field: &str) -> Result<&'a Value, CoreError> {
    raw.get(field)
        .ok_or_else(|| CoreError::data_shape(field, "missing from status payload"))
}

pub(crate) fn required_str<'a>(raw: &'a RawStatus, field: &str) -> Result<&'a str, CoreError> {
    required(raw, field)?
        .as_str()
        .ok_or_else(|| CoreError::data_shape(field, "expected a string"))
}

pub(crate) fn required_i64(raw: &RawStatus, field: &str) -> Result<i64, CoreError> {
    required(raw, field)?
        .as_i64()
        .ok_or_else(|| CoreError::data_shape(field, "expected an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawStatus {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn cutting() -> Value {
        json!({
            "mowerStatus": "OK_CUTTING",
            "storedTimestamp": 100,
            "batteryPercent": 80,
            "lastErrorCode": 0,
            "nextStartSource": "NO_SOURCE",
            "lastLocations": [
                { "latitude": 1.0, "longitude": 2.0 },
                { "latitude": 3.0, "longitude": 4.0 }
            ]
        })
    }

    #[test]
    fn parses_required_fields() {
        let snapshot = MowerSnapshot::from_raw(raw(cutting())).expect("valid snapshot");
        assert_eq!(snapshot.status(), &MowerStatus::OkCutting);
        assert_eq!(snapshot.stored_timestamp(), 100);
        assert_eq!(snapshot.battery_percent(), 80);
        assert_eq!(snapshot.next_start_source(), "NO_SOURCE");
        assert_eq!(
            snapshot.position().expect("has a fix"),
            Location {
                latitude: 1.0,
                longitude: 2.0
            }
        );
    }

    #[test]
    fn missing_error_code_is_data_shape() {
        let mut payload = raw(cutting());
        payload.remove("lastErrorCode");
        match MowerSnapshot::from_raw(payload) {
            Err(CoreError::DataShape { field, .. }) => assert_eq!(field, "lastErrorCode"),
            other => panic!("expected DataShape, got {other:?}"),
        }
    }

    #[test]
    fn mistyped_timestamp_is_data_shape() {
        let mut payload = raw(cutting());
        payload.insert("storedTimestamp".into(), json!("yesterday"));
        assert!(matches!(
            MowerSnapshot::from_raw(payload),
            Err(CoreError::DataShape { .. })
        ));
    }

    #[test]
    fn empty_location_list_has_no_position() {
        let mut payload = raw(cutting());
        payload.insert("lastLocations".into(), json!([]));
        let snapshot = MowerSnapshot::from_raw(payload).expect("still a valid snapshot");
        match snapshot.position() {
            Err(CoreError::DataShape { field, .. }) => assert_eq!(field, "lastLocations"),
            other => panic!("expected DataShape, got {other:?}"),
        }
    }

    #[test]
    fn battery_out_of_range() {
        let mut payload = raw(cutting());
        payload.insert("batteryPercent".into(), json!(250));
        assert!(MowerSnapshot::from_raw(payload).is_err());
    }
}
