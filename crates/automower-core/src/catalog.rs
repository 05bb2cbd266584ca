// ── Static lookup tables ──
//
// Status, error and model catalogs. All three are incomplete by nature
// (built from codes seen in the wild), so every lookup has a fallback:
// unknown status → raw code + default icon, unknown error → no message,
// unknown model → raw model code.

use std::borrow::Cow;

use crate::model::MowerStatus;

pub const DEFAULT_ICON: &str = "mdi:robot";
pub const VENDOR: &str = "Husqvarna";
/// Shown when no status has been fetched yet.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Icon and human message for a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub icon: &'static str,
    pub message: &'static str,
}

const fn entry(icon: &'static str, message: &'static str) -> Option<StatusEntry> {
    Some(StatusEntry { icon, message })
}

/// Catalog entry for a status, `None` for codes we have not catalogued.
pub fn status_entry(status: &MowerStatus) -> Option<StatusEntry> {
    match status {
        MowerStatus::Error => entry("mdi:alert", "Error"),
        MowerStatus::OkCharging => entry("mdi:power-plug", "Charging"),
        MowerStatus::OkCutting => entry(DEFAULT_ICON, "Cutting"),
        MowerStatus::OkCuttingManual => entry(DEFAULT_ICON, "Cutting (manual timer override)"),
        MowerStatus::OkLeaving => entry(DEFAULT_ICON, "Leaving base"),
        MowerStatus::Paused => entry("mdi:pause", "Paused"),
        MowerStatus::ParkedTimer => entry("mdi:timetable", "Parked due to timer"),
        MowerStatus::ParkedAutoTimer => entry("mdi:timetable", "Parked due to weather timer"),
        MowerStatus::ParkedSelected => entry("mdi:sleep", "Parked manually"),
        MowerStatus::OkSearching => entry("mdi:magnify", "Searching base"),
        MowerStatus::ExecutingStart => entry("mdi:dots-horizontal", "Starting..."),
        MowerStatus::ExecutingStop => entry("mdi:dots-horizontal", "Stopping..."),
        MowerStatus::ExecutingPark => entry("mdi:dots-horizontal", "Preparing to park..."),
        MowerStatus::OffHatchOpen => entry("mdi:alert", "Hatch opened"),
        MowerStatus::OffHatchClosed => entry("mdi:pause", "Stopped but not on base"),
        MowerStatus::OffDisabled => entry("mdi:close-circle-outline", "Off"),
        MowerStatus::Other(_) => None,
    }
}

/// Frontend icon for a status. No status yet, or an unknown one, gets
/// [`DEFAULT_ICON`].
pub fn icon(status: Option<&MowerStatus>) -> &'static str {
    status
        .and_then(status_entry)
        .map_or(DEFAULT_ICON, |e| e.icon)
}

/// Human status text, echoing the raw code when uncatalogued.
pub fn status_text(status: &MowerStatus) -> Cow<'_, str> {
    status_entry(status).map_or_else(|| Cow::Borrowed(status.code()), |e| Cow::Borrowed(e.message))
}

/// Message for a numeric error code. Unknown codes have no message.
pub fn error_message(code: i64) -> Option<&'static str> {
    match code {
        1 => Some("Outside working area"),
        2 => Some("No loop signal"),
        10 => Some("Upside down"),
        13 => Some("No drive"),
        _ => None,
    }
}

/// Marketing name for a vendor model code, or the code itself.
pub fn model_name(code: &str) -> &str {
    match code {
        "E" => "Automower 420",
        "G" => "Automower 430X",
        "H" => "Automower 450X",
        "L" => "Automower 315",
        other => other,
    }
}
