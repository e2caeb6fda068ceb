use std::f64::consts::PI;

use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::constants::{Radian, DPI};
use crate::sky_errors::SkyError;

/// Principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// Principal difference `a − b` between two angles, in [-π, π].
pub fn angle_diff(a: Radian, b: Radian) -> Radian {
    let mut diff = principal_angle(a) - principal_angle(b);

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Solve Kepler's equation `E − e·sin(E) = M` for the eccentric anomaly.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M in radians (any range, reduced to [-π, π] internally).
/// * `eccentricity`: e, with 0 ≤ e < 1.
///
/// Return
/// ------
/// * The eccentric anomaly E in radians, on the same branch as the reduced M.
///
/// Newton–Raphson starts from `M + e·sin(M)`, which converges in a handful of
/// iterations for the planetary eccentricities handled here (e < 0.21).
pub fn solve_kepler(mean_anomaly: Radian, eccentricity: f64) -> Result<Radian, SkyError> {
    let m = angle_diff(mean_anomaly, 0.0);

    let f = |e_anom: f64| -> f64 { e_anom - eccentricity * e_anom.sin() - m };
    let df = |e_anom: f64| -> f64 { 1.0 - eccentricity * e_anom.cos() };

    let x0 = m + eccentricity * m.sin();

    let mut tol = SimpleConvergency {
        eps: f64::EPSILON * 1e2,
        max_iter: 30,
    };

    Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_diff() {
        assert_relative_eq!(angle_diff(0.1, DPI - 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_diff(DPI - 0.1, 0.1), -0.2, epsilon = 1e-12);
        assert_relative_eq!(principal_angle(-0.5), DPI - 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_solve_kepler_circular() {
        let e_anom = solve_kepler(1.234, 0.0).unwrap();
        assert_relative_eq!(e_anom, 1.234, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_kepler_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.2056), (2.9, 0.0934), (-1.7, 0.0484), (5.5, 0.0167)] {
            let e_anom = solve_kepler(m, e).unwrap();
            let residual = angle_diff(e_anom - e * e_anom.sin(), m);
            assert!(residual.abs() < 1e-10, "m={m} e={e} residual={residual}");
        }
    }
}
