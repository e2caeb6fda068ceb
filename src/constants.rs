//! # Constants and type definitions for skywatch
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate, together with the behavioral constants of the
//! visibility policy (search horizon, "soon" window, polling interval).
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Core type aliases used across the crate
//! - Visibility policy defaults

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth radius expressed in astronomical units
pub const ERAU: f64 = (EARTH_MAJOR_AXIS / 1000.) / AU;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in astronomical units per day
pub const VLIGHT_AU: f64 = VLIGHT / AU * SECONDS_PER_DAY;

/// Solar photospheric radius in kilometers
pub const SUN_RADIUS_KM: f64 = 695_700.0;

/// Mean lunar radius in kilometers
pub const MOON_RADIUS_KM: f64 = 1_737.4;

/// Standard atmospheric refraction at the horizon, in degrees (34′)
pub const HORIZON_REFRACTION: Degree = 34.0 / 60.0;

/// First MJD (TT) covered by the analytic planetary elements (1800-01-01)
pub const MJD_MODEL_START: MJD = -21_504.0;

/// End of the analytic model window, 2051-01-01 00:00 TT (last instant of 2050)
pub const MJD_MODEL_END: MJD = 70_172.0;

// -------------------------------------------------------------------------------------------------
// Visibility policy
// -------------------------------------------------------------------------------------------------

/// Forward search horizon for rise/set events, in days
pub const RISE_SET_SEARCH_DAYS: f64 = 1.0;

/// A below-horizon body is "soon" visible if it rises within this many hours
pub const SOON_WINDOW_HOURS: f64 = 12.0;

/// Default refresh period of the watcher loop, in seconds
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Placeholder displayed when a rise or set event is absent
pub const TIME_PLACEHOLDER: &str = "--:--";

/// Number of minutes in a day, used for the next-day wraparound of clock times
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
