use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Radian, DPI, RADEG};

/// Azimuth/altitude of a body as seen from an observer.
///
/// * `azimuth`: degrees clockwise from north, in [0, 360).
/// * `altitude`: degrees above the horizon, in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPosition {
    pub azimuth: Degree,
    pub altitude: Degree,
}

impl HorizontalPosition {
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }
}

/// Atmospheric refraction handling when producing horizontal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refraction {
    /// Geometric (airless) altitude.
    None,
    /// Standard atmosphere, Saemundsson's formula.
    #[default]
    Normal,
}

impl Refraction {
    /// Refraction correction in degrees to add to a geometric altitude.
    ///
    /// Below −1° the body is well under the horizon and no correction is applied;
    /// between −1° and 90° the Saemundsson formula
    /// `R = 1.02′ / tan(h + 10.3 / (h + 5.11))` is used with `h` in degrees.
    pub fn correction(&self, geometric_altitude: Degree) -> Degree {
        match self {
            Refraction::None => 0.0,
            Refraction::Normal => {
                if !(-1.0..=90.0).contains(&geometric_altitude) {
                    return 0.0;
                }
                let h = geometric_altitude;
                let arg = (h + 10.3 / (h + 5.11)) * RADEG;
                (1.02 / arg.tan()) / 60.0
            }
        }
    }
}

/// Convert equatorial coordinates of date to horizontal coordinates.
///
/// Arguments
/// ---------
/// * `ra`, `dec`: topocentric right ascension and declination, radians.
/// * `lst`: local apparent sidereal time, radians.
/// * `latitude`: geodetic latitude, degrees.
/// * `refraction`: refraction model applied to the resulting altitude.
///
/// Return
/// ------
/// * The [`HorizontalPosition`], azimuth measured from north through east.
pub fn equatorial_to_horizontal(
    ra: Radian,
    dec: Radian,
    lst: Radian,
    latitude: Degree,
    refraction: Refraction,
) -> HorizontalPosition {
    let phi = latitude * RADEG;
    let hour_angle = lst - ra;

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_h, cos_h) = hour_angle.sin_cos();

    let sin_alt = (sin_phi * sin_dec + cos_phi * cos_dec * cos_h).clamp(-1.0, 1.0);
    let geometric_altitude = sin_alt.asin() / RADEG;

    let azimuth = (-cos_dec * sin_h)
        .atan2(sin_dec * cos_phi - cos_dec * sin_phi * cos_h)
        .rem_euclid(DPI)
        / RADEG;

    let altitude = (geometric_altitude + refraction.correction(geometric_altitude)).min(90.0);

    HorizontalPosition {
        // rem_euclid may round up to exactly 360 for tiny negative inputs
        azimuth: if azimuth >= 360.0 { 0.0 } else { azimuth },
        altitude,
    }
}

#[cfg(test)]
mod horizon_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transit_at_zenith() {
        let pos = equatorial_to_horizontal(1.0, 0.4, 1.0, 0.4 / RADEG, Refraction::None);
        assert_relative_eq!(pos.altitude, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cardinal_azimuths() {
        // equator observer, object on celestial equator 6h east of meridian → due east
        let east = equatorial_to_horizontal(
            std::f64::consts::FRAC_PI_2,
            0.0,
            0.0,
            0.0,
            Refraction::None,
        );
        assert_relative_eq!(east.azimuth, 90.0, epsilon = 1e-9);
        assert_relative_eq!(east.altitude, 0.0, epsilon = 1e-9);

        // southern observer looking at the south celestial pole → due south
        let south = equatorial_to_horizontal(
            0.0,
            -std::f64::consts::FRAC_PI_2 + 1e-9,
            0.0,
            -30.0,
            Refraction::None,
        );
        assert_relative_eq!(south.azimuth, 180.0, epsilon = 1e-6);
        assert_relative_eq!(south.altitude, 30.0, epsilon = 1e-6);
    }

    #[test]
    fn test_refraction_at_horizon() {
        let r = Refraction::Normal.correction(0.0);
        // about 29′ with Saemundsson's formula at zero geometric altitude
        assert!(r > 0.45 && r < 0.52, "r = {r}");
        assert_eq!(Refraction::Normal.correction(-5.0), 0.0);
        assert_eq!(Refraction::None.correction(0.0), 0.0);
        assert!(Refraction::Normal.correction(45.0) < 0.02);
    }
}
