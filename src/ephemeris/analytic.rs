//! # Analytic ephemeris
//!
//! Self-contained, low-precision implementation of [`EphemerisOracle`].
//!
//! ## Pipeline for a horizontal position
//!
//! ```text
//! epoch ──► MJD(TT) ──► heliocentric ecliptic J2000 (mean elements)
//!                        │  − Earth (EMB), one light-time iteration
//!                        ▼
//!              geocentric ecliptic J2000 ──► equatorial J2000 ──► mean equator of date
//!                                                                   │ − observer (LAST)
//!                                                                   ▼
//!                                            topocentric (α, δ) ──► (azimuth, altitude)
//! ```
//!
//! The Moon skips the first steps and comes straight from the lunar series in the true
//! equator of date.
//!
//! ## Rise and set
//!
//! A body rises or sets when its **geometric** topocentric altitude crosses
//! `−(34′ + semidiameter)`: 34′ is the standard horizon refraction, the semidiameter is
//! non-zero only for the Sun and the Moon. The search samples the altitude every ten
//! minutes from the start instant, and the first sign change in the requested direction
//! is refined with Brent's method to well under a second.
//!
//! ## Validity
//!
//! The planetary elements are fitted over 1800–2050; epochs outside that interval are
//! rejected with [`SkyError::EpochOutOfRange`]. Rise/set searches stop at the end of the
//! window, so an event falling after 2050 is reported as absent.

use std::cell::RefCell;

use hifitime::Epoch;
use nalgebra::Vector3;
use roots::{find_root_brent, SimpleConvergency};

use crate::bodies::Body;
use crate::constants::{
    Degree, AU, HORIZON_REFRACTION, MJD, MJD_MODEL_END, MJD_MODEL_START, MOON_RADIUS_KM,
    RADEG, RADSEC, SUN_RADIUS_KM, T2000, VLIGHT_AU,
};
use crate::earth_orientation::{nutation, obleq, prec};
use crate::ephemeris::magnitude::{apparent_magnitude, phase_fraction};
use crate::ephemeris::moon::{geocentric_equatorial, lunar_position};
use crate::ephemeris::planets::Planet;
use crate::ephemeris::{EphemerisOracle, Illumination, RiseSetDirection};
use crate::observers::horizon::{equatorial_to_horizontal, HorizontalPosition, Refraction};
use crate::observers::Observer;
use crate::ref_system::{cartesian_to_radec, ecliptic_to_equatorial, equatorial_to_ecliptic};
use crate::sky_errors::SkyError;
use crate::time::{add_days, mjd_tt};

/// Sampling step of the rise/set scan, in days (10 minutes).
const SCAN_STEP_DAYS: f64 = 10.0 / 1440.0;

/// Geometry of a body relative to the Sun and the geocenter.
struct Geometry {
    /// Geocentric position in the equator of date, AU.
    geocentric: Vector3<f64>,
    /// Sun → body distance, AU.
    helio_distance: f64,
    /// Sun → Earth distance, AU.
    earth_sun_distance: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyticEphemeris {
    refraction: Refraction,
}

impl Default for AnalyticEphemeris {
    fn default() -> Self {
        AnalyticEphemeris {
            refraction: Refraction::Normal,
        }
    }
}

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another refraction model for [`EphemerisOracle::horizontal`].
    ///
    /// Rise/set searches always use the geometric altitude against the standard
    /// refracted horizon.
    pub fn with_refraction(mut self, refraction: Refraction) -> Self {
        self.refraction = refraction;
        self
    }

    fn model_date(epoch: &Epoch) -> Result<MJD, SkyError> {
        let tjm = mjd_tt(epoch);
        if !(MJD_MODEL_START..=MJD_MODEL_END).contains(&tjm) {
            return Err(SkyError::EpochOutOfRange(tjm));
        }
        Ok(tjm)
    }

    fn planet(body: Body) -> Option<Planet> {
        match body {
            Body::Mercury => Some(Planet::Mercury),
            Body::Venus => Some(Planet::Venus),
            Body::Mars => Some(Planet::Mars),
            Body::Jupiter => Some(Planet::Jupiter),
            Body::Saturn => Some(Planet::Saturn),
            Body::Sun | Body::Moon => None,
        }
    }

    /// Geocentric position and distances of `body` at `tjm`.
    ///
    /// Sun and planets are precessed from J2000 to the mean equator of date.
    fn geometry(body: Body, tjm: MJD) -> Result<Geometry, SkyError> {
        let earth = Planet::EarthMoonBarycenter.heliocentric_position(tjm)?;
        let to_date = |ecliptic: Vector3<f64>| -> Vector3<f64> {
            prec(tjm) * ecliptic_to_equatorial(&ecliptic, obleq(T2000))
        };

        match body {
            Body::Sun => Ok(Geometry {
                geocentric: to_date(-earth),
                helio_distance: 0.0,
                earth_sun_distance: earth.norm(),
            }),
            Body::Moon => {
                let moon = geocentric_equatorial(tjm);
                let sun = to_date(-earth);
                Ok(Geometry {
                    helio_distance: (moon - sun).norm(),
                    geocentric: moon,
                    earth_sun_distance: earth.norm(),
                })
            }
            _ => {
                let planet = Self::planet(body).ok_or_else(|| {
                    SkyError::DegenerateGeometry(format!("no elements for {body}"))
                })?;

                // position at the instant the light left the planet
                let first_guess = planet.heliocentric_position(tjm)? - earth;
                let light_time = first_guess.norm() / VLIGHT_AU;
                let heliocentric = planet.heliocentric_position(tjm - light_time)?;

                Ok(Geometry {
                    geocentric: to_date(heliocentric - earth),
                    helio_distance: heliocentric.norm(),
                    earth_sun_distance: earth.norm(),
                })
            }
        }
    }

    /// Topocentric right ascension, declination (radians) and distance (AU).
    fn topocentric(
        body: Body,
        epoch: &Epoch,
        observer: &Observer,
    ) -> Result<(f64, f64, f64, f64), SkyError> {
        let tjm = Self::model_date(epoch)?;
        let lst = observer.local_sidereal_time(epoch);
        let geometry = Self::geometry(body, tjm)?;

        let topocentric = geometry.geocentric - observer.geocentric_position(lst);
        let (ra, dec, distance) = cartesian_to_radec(&topocentric);

        if !(ra.is_finite() && dec.is_finite()) || distance == 0.0 {
            return Err(SkyError::DegenerateGeometry(format!(
                "topocentric position of {body}"
            )));
        }

        Ok((ra, dec, distance, lst))
    }

    /// Angular semidiameter in degrees seen from `distance` AU.
    fn semidiameter(body: Body, distance: f64) -> Degree {
        let radius = match body {
            Body::Sun => SUN_RADIUS_KM,
            Body::Moon => MOON_RADIUS_KM,
            _ => return 0.0,
        };
        (radius / (distance * AU)).clamp(-1.0, 1.0).asin() / RADEG
    }

    /// Geometric altitude minus the rise/set threshold, degrees.
    ///
    /// Positive when the upper limb is above the refracted horizon.
    fn altitude_above_threshold(
        body: Body,
        epoch: &Epoch,
        observer: &Observer,
    ) -> Result<Degree, SkyError> {
        let (ra, dec, distance, lst) = Self::topocentric(body, epoch, observer)?;
        let position = equatorial_to_horizontal(ra, dec, lst, observer.latitude(), Refraction::None);
        let threshold = -(HORIZON_REFRACTION + Self::semidiameter(body, distance));
        Ok(position.altitude - threshold)
    }
}

impl EphemerisOracle for AnalyticEphemeris {
    fn horizontal(
        &self,
        body: Body,
        epoch: Epoch,
        observer: &Observer,
    ) -> Result<HorizontalPosition, SkyError> {
        let (ra, dec, _, lst) = Self::topocentric(body, &epoch, observer)?;
        Ok(equatorial_to_horizontal(
            ra,
            dec,
            lst,
            observer.latitude(),
            self.refraction,
        ))
    }

    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: RiseSetDirection,
        start: Epoch,
        limit_days: f64,
    ) -> Result<Option<Epoch>, SkyError> {
        if !(limit_days.is_finite() && limit_days > 0.0) {
            return Ok(None);
        }
        let tjm = Self::model_date(&start)?;
        // the search never leaves the model window: events past its end are not found
        let limit_days = limit_days.min(MJD_MODEL_END - tjm);
        if limit_days <= 0.0 {
            return Ok(None);
        }

        let offset_altitude =
            |days: f64| Self::altitude_above_threshold(body, &add_days(start, days), observer);

        let crosses = |before: f64, after: f64| match direction {
            RiseSetDirection::Rise => before < 0.0 && after >= 0.0,
            RiseSetDirection::Set => before > 0.0 && after <= 0.0,
        };

        let mut t0 = 0.0;
        let mut f0 = offset_altitude(t0)?;

        while t0 < limit_days {
            let t1 = (t0 + SCAN_STEP_DAYS).min(limit_days);
            let f1 = offset_altitude(t1)?;

            if crosses(f0, f1) {
                let failure = RefCell::new(None);
                let f = |days: f64| match offset_altitude(days) {
                    Ok(value) => value,
                    Err(err) => {
                        failure.borrow_mut().get_or_insert(err);
                        f64::NAN
                    }
                };

                let mut convergency = SimpleConvergency {
                    eps: 1e-7,
                    max_iter: 50,
                };
                let root = find_root_brent(t0, t1, &f, &mut convergency);

                if let Some(err) = failure.into_inner() {
                    return Err(err);
                }
                let root = root?;
                if root <= 0.0 {
                    // the crossing sits exactly on the start instant
                    t0 = t1;
                    f0 = f1;
                    continue;
                }
                return Ok(Some(add_days(start, root)));
            }

            t0 = t1;
            f0 = f1;
        }

        Ok(None)
    }

    fn illumination(&self, body: Body, epoch: Epoch) -> Result<Illumination, SkyError> {
        let tjm = Self::model_date(&epoch)?;
        let geometry = Self::geometry(body, tjm)?;

        let geo_distance = geometry.geocentric.norm();
        let r = geometry.helio_distance;
        let big_r = geometry.earth_sun_distance;

        let phase_angle = if body == Body::Sun || r == 0.0 || geo_distance == 0.0 {
            0.0
        } else {
            let cos_i = (r * r + geo_distance * geo_distance - big_r * big_r)
                / (2.0 * r * geo_distance);
            cos_i.clamp(-1.0, 1.0).acos() / RADEG
        };

        let magnitude = apparent_magnitude(body, r, geo_distance, phase_angle);
        if !magnitude.is_finite() {
            return Err(SkyError::DegenerateGeometry(format!("magnitude of {body}")));
        }

        Ok(Illumination {
            magnitude,
            phase_angle,
            phase_fraction: phase_fraction(phase_angle),
            helio_distance: r,
            geo_distance,
        })
    }

    fn moon_phase(&self, epoch: Epoch) -> Result<Degree, SkyError> {
        let tjm = Self::model_date(&epoch)?;

        let moon_longitude = lunar_position(tjm).longitude;

        let sun = Self::geometry(Body::Sun, tjm)?.geocentric;
        let (sun_mean_longitude, _, _) =
            cartesian_to_radec(&equatorial_to_ecliptic(&sun, obleq(tjm)));
        let (dpsi, _) = nutation(tjm);
        let sun_longitude = sun_mean_longitude + dpsi * RADSEC;

        let phase = ((moon_longitude - sun_longitude) / RADEG).rem_euclid(360.0);
        Ok(if phase >= 360.0 { 0.0 } else { phase })
    }
}
