//! # Reference-frame rotations
//!
//! Small set of frame utilities used by the analytic ephemeris:
//!
//! ```text
//! Ecliptic J2000 --(obliquity J2000)--> Equatorial J2000 --(precession)--> Mean equator of date
//! Ecliptic of date --(true obliquity)--> True equator of date        (Moon)
//! ```
//!
//! All matrices built here are **active** rotations: they rotate vectors inside a fixed frame.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI};

/// Build the rotation matrix by `alpha` radians around axis `k`.
///
/// # Arguments
///
/// * `alpha` – Rotation angle in radians.
/// * `k` – Axis index:
///   * `0` → X-axis
///   * `1` → Y-axis
///   * `2` → Z-axis
///
/// # Returns
///
/// A 3×3 orthonormal matrix `R` such that the rotated vector is `x' = R · x`.
///
/// # Panics
///
/// Panics if `k > 2`, as only axes 0–2 are valid.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotate an ecliptic vector into the equatorial frame sharing the same equinox.
pub fn ecliptic_to_equatorial(v: &Vector3<f64>, obliquity: Radian) -> Vector3<f64> {
    rotmt(obliquity, 0) * v
}

/// Rotate an equatorial vector into the ecliptic frame sharing the same equinox.
pub fn equatorial_to_ecliptic(v: &Vector3<f64>, obliquity: Radian) -> Vector3<f64> {
    rotmt(-obliquity, 0) * v
}

/// Cartesian vector from spherical coordinates (longitude, latitude, distance).
pub fn spherical_to_cartesian(lon: Radian, lat: Radian, distance: f64) -> Vector3<f64> {
    Vector3::new(
        distance * lat.cos() * lon.cos(),
        distance * lat.cos() * lon.sin(),
        distance * lat.sin(),
    )
}

/// Convert a 3D Cartesian position vector to right ascension and declination.
///
/// Arguments
/// ---------
/// * `cartesian_position`: position vector in an equatorial frame [AU or any length unit].
///
/// Returns
/// --------
/// * Tuple `(α, δ, ρ)`:
///     - `α`: right ascension in radians, in the range [0, 2π).
///     - `δ`: declination in radians, in the range [−π/2, +π/2].
///     - `ρ`: Euclidean norm of the vector.
///
/// Remarks
/// -------
/// * If the input vector has zero norm, the result is `(0.0, 0.0, 0.0)`.
/// * The same routine gives (longitude, latitude, distance) for an ecliptic vector.
pub fn cartesian_to_radec(cartesian_position: &Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).clamp(-1.0, 1.0).asin();
    let alpha = cartesian_position
        .y
        .atan2(cartesian_position.x)
        .rem_euclid(DPI);

    (alpha, delta, pos_norm)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotmt_z_quarter_turn() {
        let r = rotmt(FRAC_PI_2, 2);
        let v = r * Vector3::x();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-15);
    }

    #[test]
    fn test_ecliptic_pole_goes_to_equatorial_frame() {
        let eps = 23.4392911_f64.to_radians();
        let pole = ecliptic_to_equatorial(&Vector3::z(), eps);
        // the ecliptic pole sits at RA 18h, Dec 90° - ε
        let (ra, dec, _) = cartesian_to_radec(&pole);
        assert_relative_eq!(ra, 1.5 * std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(dec, FRAC_PI_2 - eps, epsilon = 1e-12);

        let back = equatorial_to_ecliptic(&pole, eps);
        assert_relative_eq!(back, Vector3::z(), epsilon = 1e-15);
    }

    #[test]
    fn test_cartesian_to_radec() {
        let v = spherical_to_cartesian(1.0, -0.3, 2.5);
        let (ra, dec, rho) = cartesian_to_radec(&v);
        assert_relative_eq!(ra, 1.0, epsilon = 1e-12);
        assert_relative_eq!(dec, -0.3, epsilon = 1e-12);
        assert_relative_eq!(rho, 2.5, epsilon = 1e-12);

        assert_eq!(cartesian_to_radec(&Vector3::zeros()), (0.0, 0.0, 0.0));
    }
}
