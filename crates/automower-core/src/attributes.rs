// ── Generic attribute view ──
//
// Reshapes a raw status payload into the key-sorted attribute map the
// host displays next to the dedicated accessors.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use automower_api::RawStatus;

use crate::catalog;
use crate::error::CoreError;
use crate::model::snapshot::{required_i64, required_str};

/// Integer timestamps above this are milliseconds, not seconds.
pub const MILLISECOND_THRESHOLD: i64 = 999_999_999_999;

const TIMESTAMP_FIELDS: [&str; 3] = ["lastErrorCodeTimestamp", "nextStartTimestamp", "storedTimestamp"];

/// Fields with a dedicated accessor, or no value to the user.
const IGNORED_FIELDS: [&str; 5] = [
    "batteryPercent",
    "cachedSettingsUUID",
    "lastLocations",
    "mowerStatus",
    "valueFound",
];

const ERROR_FIELDS: [&str; 3] = ["lastErrorCode", "lastErrorCodeTimestamp", "lastErrorMessage"];

const NO_SOURCE: &str = "NO_SOURCE";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Timestamp(DateTime<Utc>),
    Value(Value),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::Value(Value::String(s)) => f.write_str(s),
            Self::Value(Value::Null) => f.write_str("-"),
            Self::Value(other) => write!(f, "{other}"),
        }
    }
}

pub type Attributes = BTreeMap<String, AttributeValue>;

/// Interpret a vendor epoch value, which is sometimes seconds and
/// sometimes milliseconds. `None` when out of chrono's range.
pub fn normalize_timestamp(raw: i64) -> Option<DateTime<Utc>> {
    if raw > MILLISECOND_THRESHOLD {
        DateTime::from_timestamp_millis(raw)
    } else {
        DateTime::from_timestamp(raw, 0)
    }
}

/// Build the display attribute set for one raw payload.
///
/// `lastErrorCode` and `nextStartSource` decide which keys survive, so
/// both must be present.
pub fn normalize_attributes(raw: &RawStatus) -> Result<Attributes, CoreError> {
    let error_code = required_i64(raw, "lastErrorCode")?;
    let no_source = required_str(raw, "nextStartSource")? == NO_SOURCE;

    let skip = |key: &str| {
        IGNORED_FIELDS.contains(&key)
            || (error_code <= 0 && ERROR_FIELDS.contains(&key))
            || (no_source && key == "nextStartTimestamp")
    };

    let mut attributes: Attributes = raw
        .iter()
        .filter(|(key, _)| !skip(key))
        .map(|(key, value)| (key.clone(), normalize_value(key, value)))
        .collect();

    if error_code > 0 {
        match catalog::error_message(error_code) {
            Some(message) => {
                attributes.insert(
                    "lastErrorMessage".into(),
                    AttributeValue::Value(Value::from(message)),
                );
            }
            None => {
                attributes.remove("lastErrorMessage");
            }
        }
    }

    Ok(attributes)
}

fn normalize_value(key: &str, value: &Value) -> AttributeValue {
    let timestamp = if TIMESTAMP_FIELDS.contains(&key) {
        value.as_i64().and_then(normalize_timestamp)
    } else {
        None
    };
    timestamp.map_or_else(|| AttributeValue::Value(value.clone()), AttributeValue::Timestamp)
}
