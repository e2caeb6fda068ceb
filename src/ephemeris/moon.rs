//! Geocentric position of the Moon from a truncated periodic series.
//!
//! The series keeps the principal terms of the ELP-2000/82 theory in longitude (16 terms),
//! distance (13 terms) and latitude (10 terms). Compared with the full theory the errors
//! reach a few arcminutes in longitude and about a hundred kilometers in distance, which
//! shifts a moonrise by well under a minute.

use nalgebra::Vector3;

use crate::constants::{Kilometer, Radian, AU, MJD, RADEG, RADSEC, T2000};
use crate::earth_orientation::{nutation, true_obliquity};
use crate::ref_system::{ecliptic_to_equatorial, spherical_to_cartesian};

/// Mean Earth–Moon distance used as the constant term of the distance series, km.
const MEAN_DISTANCE: Kilometer = 385_000.56;

/// Periodic term: multipliers of (D, M, M', F) and amplitude.
type Term = ([i8; 4], f64);

/// Longitude terms, amplitude in 1e-6 degree.
const LONGITUDE_TERMS: [Term; 16] = [
    ([0, 0, 1, 0], 6_288_774.0),
    ([2, 0, -1, 0], 1_274_027.0),
    ([2, 0, 0, 0], 658_314.0),
    ([0, 0, 2, 0], 213_618.0),
    ([0, 1, 0, 0], -185_116.0),
    ([0, 0, 0, 2], -114_332.0),
    ([2, 0, -2, 0], 58_793.0),
    ([2, -1, -1, 0], 57_066.0),
    ([2, 0, 1, 0], 53_322.0),
    ([2, -1, 0, 0], 45_758.0),
    ([0, 1, -1, 0], -40_923.0),
    ([1, 0, 0, 0], -34_720.0),
    ([0, 1, 1, 0], -30_383.0),
    ([2, 0, 0, -2], 15_327.0),
    ([0, 0, 1, 2], -12_528.0),
    ([0, 0, 1, -2], 10_980.0),
];

/// Distance terms, amplitude in 1e-3 km.
const DISTANCE_TERMS: [Term; 13] = [
    ([0, 0, 1, 0], -20_905_355.0),
    ([2, 0, -1, 0], -3_699_111.0),
    ([2, 0, 0, 0], -2_955_968.0),
    ([0, 0, 2, 0], -569_925.0),
    ([0, 1, 0, 0], 48_888.0),
    ([0, 0, 0, 2], -3_149.0),
    ([2, 0, -2, 0], 246_158.0),
    ([2, -1, -1, 0], -152_138.0),
    ([2, 0, 1, 0], -170_733.0),
    ([2, -1, 0, 0], -204_586.0),
    ([0, 1, -1, 0], -129_620.0),
    ([1, 0, 0, 0], 108_743.0),
    ([0, 1, 1, 0], 104_755.0),
];

/// Latitude terms, amplitude in 1e-6 degree.
const LATITUDE_TERMS: [Term; 10] = [
    ([0, 0, 0, 1], 5_128_122.0),
    ([0, 0, 1, 1], 280_602.0),
    ([0, 0, 1, -1], 277_693.0),
    ([2, 0, 0, -1], 173_237.0),
    ([2, 0, -1, 1], 55_413.0),
    ([2, 0, -1, -1], 46_271.0),
    ([2, 0, 0, 1], 32_573.0),
    ([0, 0, 2, 1], 17_198.0),
    ([2, 0, 1, -1], 9_266.0),
    ([0, 0, 2, -1], 8_822.0),
];

/// Apparent geocentric ecliptic coordinates of the Moon, referred to the equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPosition {
    /// Ecliptic longitude including nutation, radians in [0, 2π).
    pub longitude: Radian,
    pub latitude: Radian,
    pub distance: Kilometer,
}

/// Fundamental arguments (D, M, M', F) in radians and the eccentricity factor E.
fn fundamental_arguments(t: f64) -> ([f64; 4], f64, f64) {
    let mean_longitude = 218.3164477 + 481_267.881_234_21 * t;
    let elongation = 297.8501921 + 445_267.111_403_4 * t;
    let sun_anomaly = 357.5291092 + 35_999.050_290_9 * t;
    let moon_anomaly = 134.9633964 + 477_198.867_505_5 * t;
    let latitude_argument = 93.2720950 + 483_202.017_523_3 * t;

    let eccentricity_factor = 1.0 - 0.002516 * t - 0.0000074 * t * t;

    (
        [
            elongation * RADEG,
            sun_anomaly * RADEG,
            moon_anomaly * RADEG,
            latitude_argument * RADEG,
        ],
        mean_longitude,
        eccentricity_factor,
    )
}

/// Sum a series of sine (or cosine) terms, scaling by E^|m| for terms in the solar anomaly.
fn sum_terms(terms: &[Term], args: &[f64; 4], e: f64, periodic: fn(f64) -> f64) -> f64 {
    terms
        .iter()
        .map(|(mult, amplitude)| {
            let angle: f64 = mult
                .iter()
                .zip(args.iter())
                .map(|(&k, &arg)| k as f64 * arg)
                .sum();
            let scale = e.powi(mult[1].unsigned_abs() as i32);
            amplitude * scale * periodic(angle)
        })
        .sum()
}

/// Ecliptic position of the Moon at `tjm` (MJD, TT).
pub fn lunar_position(tjm: MJD) -> LunarPosition {
    let t = (tjm - T2000) / 36525.0;
    let (args, mean_longitude, e) = fundamental_arguments(t);

    let sigma_l = sum_terms(&LONGITUDE_TERMS, &args, e, f64::sin);
    let sigma_r = sum_terms(&DISTANCE_TERMS, &args, e, f64::cos);
    let sigma_b = sum_terms(&LATITUDE_TERMS, &args, e, f64::sin);

    let (dpsi, _) = nutation(tjm);

    let longitude = (mean_longitude + sigma_l / 1e6) * RADEG + dpsi * RADSEC;

    LunarPosition {
        longitude: longitude.rem_euclid(crate::constants::DPI),
        latitude: sigma_b / 1e6 * RADEG,
        distance: MEAN_DISTANCE + sigma_r / 1000.0,
    }
}

/// Geocentric equatorial position of the Moon in the true equator of date, in AU.
pub fn geocentric_equatorial(tjm: MJD) -> Vector3<f64> {
    let pos = lunar_position(tjm);
    let ecliptic = spherical_to_cartesian(pos.longitude, pos.latitude, pos.distance / AU);
    ecliptic_to_equatorial(&ecliptic, true_obliquity(tjm))
}

#[cfg(test)]
mod moon_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lunar_position_reference_epoch() {
        // 1992 April 12, 0h TD (JD 2448724.5)
        let pos = lunar_position(48_724.0);
        assert_relative_eq!(pos.longitude / RADEG, 133.167, epsilon = 0.1);
        assert_relative_eq!(pos.latitude / RADEG, -3.229, epsilon = 0.05);
        assert_relative_eq!(pos.distance, 368_409.7, epsilon = 300.0);
    }

    #[test]
    fn test_distance_bounds() {
        for k in 0..60 {
            let d = lunar_position(60_000.0 + k as f64 * 0.5).distance;
            assert!(d > 355_000.0 && d < 408_000.0, "d = {d}");
        }
    }

    #[test]
    fn test_geocentric_equatorial_norm() {
        let tjm = 60_500.0;
        let v = geocentric_equatorial(tjm);
        assert_relative_eq!(
            v.norm() * AU,
            lunar_position(tjm).distance,
            epsilon = 1e-6
        );
    }
}
