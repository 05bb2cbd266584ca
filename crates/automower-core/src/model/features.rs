// ── Supported-feature flags ──

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Feature bitmask advertised to the host's vacuum-style entity.
///
/// Bit values match the host platform's own constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    pub const TURN_ON: Self = Self(1);
    pub const TURN_OFF: Self = Self(2);
    pub const PAUSE: Self = Self(4);
    pub const STOP: Self = Self(8);
    pub const RETURN_HOME: Self = Self(16);
    pub const BATTERY: Self = Self(64);
    pub const STATUS: Self = Self(128);

    /// Everything an Automower supports.
    pub const MOWER: Self = Self(
        Self::TURN_ON.0
            | Self::TURN_OFF.0
            | Self::PAUSE.0
            | Self::STOP.0
            | Self::RETURN_HOME.0
            | Self::STATUS.0
            | Self::BATTERY.0,
    );

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SupportedFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for SupportedFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::SupportedFeatures as F;

    #[test]
    fn mower_union() {
        assert_eq!(F::MOWER.bits(), 223);
        assert_eq!(
            F::TURN_ON | F::TURN_OFF | F::PAUSE | F::STOP | F::RETURN_HOME | F::STATUS | F::BATTERY,
            F::MOWER
        );
        assert!(F::MOWER.contains(F::RETURN_HOME));
        assert!(!F::MOWER.contains(F(32)));
    }
}
