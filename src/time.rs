//! # Time scales, sidereal time and wall-clock formatting
//!
//! Everything in the crate is timestamped with [`hifitime::Epoch`]. This module converts
//! epochs to the day counts used by the analytic models (MJD in TT, MJD in UT1), computes
//! Greenwich mean sidereal time, and turns event instants into the local `HH:MM` clock
//! strings shown to the user.
//!
//! UT1 is approximated by UTC (|UT1 − UTC| < 0.9 s), which is far below the resolution of a
//! minute-level display.
//!
//! ## See also
//! ------------
//! * [`ClockTime`] – Local time-of-day used for display and ordering.
//! * [`Clock`] – Injectable source of "now" for the refresh loop.

use std::fmt;

use hifitime::{Duration, Epoch, Unit};

use crate::constants::{DPI, MINUTES_PER_DAY, MJD, T2000, TIME_PLACEHOLDER};
use crate::sky_errors::SkyError;

/// Modified Julian Date of `epoch` in the Terrestrial Time scale.
pub fn mjd_tt(epoch: &Epoch) -> MJD {
    epoch.to_mjd_tt_days()
}

/// Modified Julian Date of `epoch` in UT1, approximated by UTC.
pub fn mjd_ut1(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Offset `epoch` by a fractional number of days.
pub fn add_days(epoch: Epoch, days: f64) -> Epoch {
    epoch + Unit::Day * days
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # Details
/// 1. A cubic polynomial (coefficients C0–C3) gives GMST at 0h UT1 in seconds.
/// 2. The fraction of the day elapsed since 0h UT1 is scaled by `RAP`, the ratio of
///    sidereal to solar day.
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let day = tjm.floor();
    let t = (day - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;
    let h = (tjm - day) * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Local wall-clock time of day, truncated to the minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        ClockTime { hour, minute }
    }

    /// Wall-clock time of `epoch` in a zone `utc_offset` ahead of UTC.
    ///
    /// Seconds are truncated, not rounded, so 20:59:59 reads "20:59".
    pub fn from_epoch(epoch: Epoch, utc_offset: Duration) -> Self {
        let (_, _, _, hour, minute, _, _) = (epoch + utc_offset).to_gregorian_utc();
        ClockTime { hour, minute }
    }

    /// Minutes elapsed since local midnight.
    pub fn minutes(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    /// Ordering key relative to the current clock time.
    ///
    /// A time of day earlier than `now` belongs to the next day and is pushed 24 h later,
    /// so that a same-day ordering survives the midnight wrap.
    pub fn minutes_after(&self, now: ClockTime) -> u32 {
        let minutes = self.minutes();
        if minutes < now.minutes() {
            minutes + MINUTES_PER_DAY
        } else {
            minutes
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Format an optional event as `HH:MM`, or the `--:--` placeholder when absent.
pub fn format_clock(clock: Option<ClockTime>) -> String {
    clock
        .map(|c| c.to_string())
        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
}

/// Source of the current instant.
///
/// The refresh loop reads the time through this trait so that tests can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<Epoch, SkyError>;
}

/// Wall clock of the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Epoch, SkyError> {
        Ok(Epoch::now()?)
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Epoch);

impl Clock for FixedClock {
    fn now(&self) -> Result<Epoch, SkyError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_relative_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-12);

        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_mjd_conversions() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2021, 1, 1);
        assert_eq!(mjd_ut1(&epoch), 59215.0);
        // TT runs 69.184 s ahead of UTC in 2021
        assert_relative_eq!(mjd_tt(&epoch), 59215.0 + 69.184 / 86400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clock_from_epoch_with_offset() {
        let epoch = Epoch::from_gregorian_utc_hms(2025, 6, 21, 23, 0, 0);
        let sao_paulo = Unit::Hour * -3.0;
        assert_eq!(ClockTime::from_epoch(epoch, sao_paulo), ClockTime::new(20, 0));
        assert_eq!(ClockTime::from_epoch(epoch, Duration::ZERO), ClockTime::new(23, 0));

        let late = Epoch::from_gregorian_utc_hms(2025, 6, 21, 20, 59, 59);
        assert_eq!(
            ClockTime::from_epoch(late, Duration::ZERO).to_string(),
            "20:59"
        );
    }

    #[test]
    fn test_minutes_after_wraps_past_midnight() {
        let now = ClockTime::new(22, 0);
        let before_midnight = ClockTime::new(23, 50);
        let after_midnight = ClockTime::new(0, 10);

        assert_eq!(before_midnight.minutes_after(now), 23 * 60 + 50);
        assert_eq!(after_midnight.minutes_after(now), 10 + 24 * 60);
        assert!(before_midnight.minutes_after(now) < after_midnight.minutes_after(now));
        assert_eq!(now.minutes_after(now), 22 * 60);
    }

    #[test]
    fn test_format_clock_placeholder() {
        assert_eq!(format_clock(None), "--:--");
        assert_eq!(format_clock(Some(ClockTime::new(6, 5))), "06:05");
    }
}
