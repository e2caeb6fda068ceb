//! Named lunar phases.
//!
//! The phase angle is the geocentric ecliptic longitude of the Moon minus that of the Sun
//! (0° new, 90° first quarter, 180° full, 270° last quarter). The four names split the
//! circle into 90° sectors centered on those points.

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::bodies::Locale;
use crate::constants::Degree;
use crate::ephemeris::EphemerisOracle;
use crate::sky_errors::SkyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhaseName {
    New,
    Waxing,
    Full,
    Waning,
}

impl MoonPhaseName {
    /// Classify a phase angle in degrees; values outside [0, 360) are wrapped first.
    ///
    /// ```text
    /// [0, 45) ∪ [315, 360) → New
    /// [45, 135)            → Waxing
    /// [135, 225)           → Full
    /// [225, 315)           → Waning
    /// ```
    pub fn from_phase_angle(phase: Degree) -> Self {
        let phase = phase.rem_euclid(360.0);
        if !(45.0..315.0).contains(&phase) {
            MoonPhaseName::New
        } else if phase < 135.0 {
            MoonPhaseName::Waxing
        } else if phase < 225.0 {
            MoonPhaseName::Full
        } else {
            MoonPhaseName::Waning
        }
    }

    /// Phase name of the Moon at `epoch`.
    pub fn at<O: EphemerisOracle + ?Sized>(oracle: &O, epoch: Epoch) -> Result<Self, SkyError> {
        Ok(Self::from_phase_angle(oracle.moon_phase(epoch)?))
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (MoonPhaseName::New, Locale::English) => "New Moon",
            (MoonPhaseName::Waxing, Locale::English) => "Waxing Moon",
            (MoonPhaseName::Full, Locale::English) => "Full Moon",
            (MoonPhaseName::Waning, Locale::English) => "Waning Moon",
            (MoonPhaseName::New, Locale::PortugueseBr) => "Lua Nova",
            (MoonPhaseName::Waxing, Locale::PortugueseBr) => "Lua Crescente",
            (MoonPhaseName::Full, Locale::PortugueseBr) => "Lua Cheia",
            (MoonPhaseName::Waning, Locale::PortugueseBr) => "Lua Minguante",
        }
    }

    /// Sprite shown next to the phase name.
    pub fn icon(&self) -> &'static str {
        match self {
            MoonPhaseName::New => "images/nova.png",
            MoonPhaseName::Waxing => "images/crescente.png",
            MoonPhaseName::Full => "images/cheia.png",
            MoonPhaseName::Waning => "images/minguante.png",
        }
    }
}

#[cfg(test)]
mod moon_phase_test {
    use super::*;

    #[test]
    fn test_sector_boundaries() {
        assert_eq!(MoonPhaseName::from_phase_angle(0.0), MoonPhaseName::New);
        assert_eq!(MoonPhaseName::from_phase_angle(44.99), MoonPhaseName::New);
        assert_eq!(MoonPhaseName::from_phase_angle(45.0), MoonPhaseName::Waxing);
        assert_eq!(MoonPhaseName::from_phase_angle(134.9), MoonPhaseName::Waxing);
        assert_eq!(MoonPhaseName::from_phase_angle(135.0), MoonPhaseName::Full);
        assert_eq!(MoonPhaseName::from_phase_angle(225.0), MoonPhaseName::Waning);
        assert_eq!(MoonPhaseName::from_phase_angle(314.9), MoonPhaseName::Waning);
        assert_eq!(MoonPhaseName::from_phase_angle(315.0), MoonPhaseName::New);
        assert_eq!(MoonPhaseName::from_phase_angle(359.99), MoonPhaseName::New);
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(MoonPhaseName::from_phase_angle(-90.0), MoonPhaseName::Waning);
        assert_eq!(MoonPhaseName::from_phase_angle(540.0), MoonPhaseName::Full);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MoonPhaseName::Full.label(Locale::PortugueseBr), "Lua Cheia");
        assert_eq!(MoonPhaseName::Waxing.label(Locale::English), "Waxing Moon");
        assert_eq!(MoonPhaseName::Waning.icon(), "images/minguante.png");
    }
}
