//! # Observer & site geometry
//!
//! An [`Observer`] is the geographic position from which the sky is evaluated:
//! geodetic latitude/longitude in degrees and elevation in meters, as delivered by a
//! location fix. The constructor validates the inputs and precomputes the geocentric
//! parallax coordinates (ρ·cosφ, ρ·sinφ) needed to turn geocentric positions into
//! topocentric ones.
//!
//! ## Frames & conventions
//!
//! - Longitudes: **degrees**, east positive.
//! - Elevation: **meters** above the reference ellipsoid.
//! - Geocentric parallax (ρ·cosφ, ρ·sinφ): **Earth radii**.
//! - [`Observer::geocentric_position`] is expressed in the **true equator of date** for a
//!   given local apparent sidereal time, in **AU**.
//!
//! ## See also
//! ------------
//! * [`horizon`] – Equatorial → horizontal conversion and refraction.
//! * [`geodetic_to_parallax`] – Geodetic latitude/elevation → (ρ·cosφ, ρ·sinφ).

pub mod horizon;

use hifitime::Epoch;
use nalgebra::Vector3;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, ERAU, RADEG};
use crate::earth_orientation::equequ;
use crate::sky_errors::SkyError;
use crate::time::{gmst, mjd_tt, mjd_ut1};

/// Geographic position of the person looking at the sky.
///
/// Immutable once built; a new location fix produces a new observer.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Observer {
    latitude: NotNan<f64>,
    longitude: NotNan<f64>,
    elevation: NotNan<f64>,

    /// ρ·cosφ (geocentric latitude φ), in **Earth radii**.
    rho_cos_phi: NotNan<f64>,

    /// ρ·sinφ (geocentric latitude φ), in **Earth radii**.
    rho_sin_phi: NotNan<f64>,
}

fn not_nan(value: f64, what: &str) -> Result<NotNan<f64>, SkyError> {
    NotNan::new(value).map_err(|_| SkyError::InvalidObserver(format!("{what} is NaN")))
}

impl Observer {
    /// Create a new observer from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: Geodetic latitude in **degrees**, within [-90, 90].
    /// * `longitude`: Geodetic longitude in **degrees** (east positive), within [-180, 360).
    /// * `elevation`: Height above the reference ellipsoid in **meters**.
    ///
    /// Return
    /// ----------
    /// * A constructed [`Observer`], or [`SkyError::InvalidObserver`] when a coordinate is
    ///   NaN, infinite or out of range.
    pub fn new(latitude: Degree, longitude: Degree, elevation: Meter) -> Result<Self, SkyError> {
        let latitude_nn = not_nan(latitude, "latitude")?;
        let longitude_nn = not_nan(longitude, "longitude")?;
        let elevation_nn = not_nan(elevation, "elevation")?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SkyError::InvalidObserver(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..360.0).contains(&longitude) {
            return Err(SkyError::InvalidObserver(format!(
                "longitude {longitude} outside [-180, 360)"
            )));
        }
        if !elevation.is_finite() {
            return Err(SkyError::InvalidObserver(format!(
                "elevation {elevation} is not finite"
            )));
        }

        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, elevation);

        Ok(Observer {
            latitude: latitude_nn,
            longitude: longitude_nn,
            elevation: elevation_nn,
            rho_cos_phi: not_nan(rho_cos_phi, "rho_cos_phi")?,
            rho_sin_phi: not_nan(rho_sin_phi, "rho_sin_phi")?,
        })
    }

    pub fn latitude(&self) -> Degree {
        self.latitude.into_inner()
    }

    pub fn longitude(&self) -> Degree {
        self.longitude.into_inner()
    }

    pub fn elevation(&self) -> Meter {
        self.elevation.into_inner()
    }

    /// Geocentric parallax coordinates `(ρ·cosφ, ρ·sinφ)` in Earth radii.
    pub fn parallax(&self) -> (f64, f64) {
        (self.rho_cos_phi.into_inner(), self.rho_sin_phi.into_inner())
    }

    /// Local apparent sidereal time at `epoch`, in radians within [0, 2π).
    ///
    /// GMST plus the equation of the equinoxes plus the east longitude.
    pub fn local_sidereal_time(&self, epoch: &Epoch) -> Radian {
        let gast = gmst(mjd_ut1(epoch)) + equequ(mjd_tt(epoch));
        (gast + self.longitude() * RADEG).rem_euclid(crate::constants::DPI)
    }

    /// Geocentric position of the observer in the true equator of date, in **AU**.
    ///
    /// Arguments
    /// -----------------
    /// * `lst`: local apparent sidereal time in radians.
    pub fn geocentric_position(&self, lst: Radian) -> Vector3<f64> {
        let (rho_cos_phi, rho_sin_phi) = self.parallax();
        Vector3::new(
            ERAU * rho_cos_phi * lst.cos(),
            ERAU * rho_cos_phi * lst.sin(),
            ERAU * rho_sin_phi,
        )
    }
}

/// Geodetic latitude (radians) and height (meters) to normalized parallax coordinates.
///
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
///
/// where `a` and `b` are the Earth's semi-major and semi-minor axes,
/// and `h` is the height above the ellipsoid.
fn lat_alt_to_parallax(lat: Radian, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Convert geodetic latitude (in degrees) and height (in meters)
/// into normalized parallax coordinates `(ρ·cosφ, ρ·sinφ)`.
///
/// # See also
/// * [`lat_alt_to_parallax`] – Performs the actual computation given latitude in radians.
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height)
}

/// Observer position as reported by a location provider.
///
/// `altitude` follows the naming of mobile location APIs and is the elevation in meters;
/// providers that cannot measure it report `None`, which maps to sea level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: Degree,
    pub longitude: Degree,
    #[serde(default)]
    pub altitude: Option<Meter>,
}

impl TryFrom<LocationFix> for Observer {
    type Error = SkyError;

    fn try_from(fix: LocationFix) -> Result<Self, Self::Error> {
        Observer::new(fix.latitude, fix.longitude, fix.altitude.unwrap_or(0.0))
    }
}
