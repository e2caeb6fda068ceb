//! Apparent visual magnitudes.
//!
//! Planets use the classical expressions `H + 5·log10(r·Δ) + f(i)` with the phase
//! coefficients tabulated in the Astronomical Almanac (Müller's values revised by
//! Harris), `r` and `Δ` in AU and the phase angle `i` in degrees. Saturn's ring
//! contribution is ignored, which can make it up to ~0.8 mag fainter than observed.

use crate::bodies::Body;
use crate::constants::Degree;

/// Apparent magnitude of the Sun seen from 1 AU.
const SUN_MAGNITUDE: f64 = -26.74;

/// Apparent visual magnitude of `body`.
///
/// Arguments
/// ---------
/// * `helio_distance`: Sun–body distance in AU (ignored for the Sun and the Moon).
/// * `geo_distance`: Earth–body distance in AU (ignored for the Moon).
/// * `phase_angle`: Sun–body–Earth angle in degrees.
pub fn apparent_magnitude(
    body: Body,
    helio_distance: f64,
    geo_distance: f64,
    phase_angle: Degree,
) -> f64 {
    let i = phase_angle;
    let distance_term = || 5.0 * (helio_distance * geo_distance).log10();

    match body {
        Body::Sun => SUN_MAGNITUDE + 5.0 * geo_distance.log10(),
        Body::Moon => -12.73 + 0.026 * i.abs() + 4.0e-9 * i.powi(4),
        Body::Mercury => {
            -0.42 + distance_term() + 0.0380 * i - 0.000273 * i.powi(2) + 0.000002 * i.powi(3)
        }
        Body::Venus => {
            -4.40 + distance_term() + 0.0009 * i + 0.000239 * i.powi(2) - 0.00000065 * i.powi(3)
        }
        Body::Mars => -1.52 + distance_term() + 0.016 * i,
        Body::Jupiter => -9.40 + distance_term() + 0.005 * i,
        Body::Saturn => -8.88 + distance_term() + 0.044 * i,
    }
}

/// Illuminated fraction of the disc for a phase angle in degrees.
pub fn phase_fraction(phase_angle: Degree) -> f64 {
    (1.0 + phase_angle.to_radians().cos()) / 2.0
}
