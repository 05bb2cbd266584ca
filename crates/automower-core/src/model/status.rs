// ── Mower status codes ──

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vendor status code.
///
/// Every code we have observed gets its own variant; anything else is
/// carried verbatim in [`Other`](Self::Other) so it can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MowerStatus {
    Error,
    OkCharging,
    OkCutting,
    /// Cutting with the timer overridden from the mower's keypad.
    OkCuttingManual,
    OkLeaving,
    OkSearching,
    ParkedTimer,
    ParkedAutoTimer,
    ParkedSelected,
    Paused,
    ExecutingPark,
    ExecutingStart,
    ExecutingStop,
    OffHatchOpen,
    OffHatchClosed,
    OffDisabled,
    Other(String),
}

impl MowerStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "ERROR" => Self::Error,
            "OK_CHARGING" => Self::OkCharging,
            "OK_CUTTING" => Self::OkCutting,
            "OK_CUTTING_NOT_AUTO" => Self::OkCuttingManual,
            "OK_LEAVING" => Self::OkLeaving,
            "OK_SEARCHING" => Self::OkSearching,
            "PARKED_TIMER" => Self::ParkedTimer,
            "PARKED_AUTOTIMER" => Self::ParkedAutoTimer,
            "PARKED_PARKED_SELECTED" => Self::ParkedSelected,
            "PAUSED" => Self::Paused,
            "EXECUTING_PARK" => Self::ExecutingPark,
            "EXECUTING_START" => Self::ExecutingStart,
            "EXECUTING_STOP" => Self::ExecutingStop,
            "OFF_HATCH_OPEN" => Self::OffHatchOpen,
            "OFF_HATCH_CLOSED_DISABLED" => Self::OffHatchClosed,
            "OFF_DISABLED" => Self::OffDisabled,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The vendor code, exactly as the API spells it.
    pub fn code(&self) -> &str {
        match self {
            Self::Error => "ERROR",
            Self::OkCharging => "OK_CHARGING",
            Self::OkCutting => "OK_CUTTING",
            Self::OkCuttingManual => "OK_CUTTING_NOT_AUTO",
            Self::OkLeaving => "OK_LEAVING",
            Self::OkSearching => "OK_SEARCHING",
            Self::ParkedTimer => "PARKED_TIMER",
            Self::ParkedAutoTimer => "PARKED_AUTOTIMER",
            Self::ParkedSelected => "PARKED_PARKED_SELECTED",
            Self::Paused => "PAUSED",
            Self::ExecutingPark => "EXECUTING_PARK",
            Self::ExecutingStart => "EXECUTING_START",
            Self::ExecutingStop => "EXECUTING_STOP",
            Self::OffHatchOpen => "OFF_HATCH_OPEN",
            Self::OffHatchClosed => "OFF_HATCH_CLOSED_DISABLED",
            Self::OffDisabled => "OFF_DISABLED",
            Self::Other(code) => code,
        }
    }

    /// Starting, charging, cutting (including manual override), leaving
    /// base, or searching for base.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::ExecutingStart
                | Self::OkCharging
                | Self::OkCutting
                | Self::OkCuttingManual
                | Self::OkLeaving
                | Self::OkSearching
        )
    }

    /// One of the locally issued `EXECUTING_*` codes.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            Self::ExecutingStart | Self::ExecutingStop | Self::ExecutingPark
        )
    }
}

impl fmt::Display for MowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MowerStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_code(s))
    }
}

impl From<String> for MowerStatus {
    fn from(code: String) -> Self {
        match Self::from_code(&code) {
            Self::Other(_) => Self::Other(code),
            known => known,
        }
    }
}

impl From<MowerStatus> for String {
    fn from(status: MowerStatus) -> Self {
        match status {
            MowerStatus::Other(code) => code,
            known => known.code().to_owned(),
        }
    }
}
