use nalgebra::Matrix3;

use crate::{
    constants::{ArcSec, Radian, MJD, RADEG, RADSEC, T2000},
    ref_system::rotmt,
};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(t) = ε₀ + ε₁·T + ε₂·T² + ε₃·T³,   T = (tjm - T2000) / 36525
/// ```
/// evaluated with Horner's method, coefficients in arcseconds.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity, truncated to the four dominant terms.
///
/// The retained terms depend on the longitude of the Moon's ascending node and on the
/// mean longitudes of the Sun and Moon; the truncation error is about 0.5″ in Δψ and
/// 0.1″ in Δε, well below what a naked-eye visibility check can resolve.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * `(Δψ, Δε)` in arcseconds.
pub fn nutation(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / 36525.0;

    let node = (125.04452 - 1934.136261 * t) * RADEG;
    let sun = (280.4665 + 36000.7698 * t) * RADEG;
    let moon = (218.3165 + 481267.8813 * t) * RADEG;

    let dpsi = -17.20 * node.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * node).sin();
    let deps = 9.20 * node.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
        - 0.09 * (2.0 * node).cos();

    (dpsi, deps)
}

/// True obliquity ε + Δε of the ecliptic, in radians.
pub fn true_obliquity(tjm: MJD) -> Radian {
    let (_, deps) = nutation(tjm);
    obleq(tjm) + deps * RADSEC
}

/// Compute the equation of the equinoxes (Δψ · cos ε) in radians.
///
/// This is the difference between apparent and mean sidereal time.
///
/// # See also
/// * [`obleq`] – Mean obliquity of the ecliptic.
/// * [`nutation`] – Δψ and Δε.
pub fn equequ(tjm: MJD) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutation(tjm);
    RADSEC * dpsi * oblm.cos()
}

/// Precession matrix from the J2000 mean equator to the mean equator of date (IAU 1976).
///
/// The matrix acts on vectors: `x_date = P · x_J2000`. It is the composition of three
/// active rotations, `Rz(z) · Ry(−θ) · Rz(ζ)`, with
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
pub fn prec(tjm: MJD) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rotmt(z, 2) * rotmt(-theta, 1) * rotmt(zeta, 2)
}
