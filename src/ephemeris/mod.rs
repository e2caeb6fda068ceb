//! # Ephemeris oracle
//!
//! The visibility classifier never computes positions itself: it asks an
//! [`EphemerisOracle`] for the horizontal coordinates of a body and for its next rise or
//! set event. This keeps the classification policy independent of the astronomy and lets
//! tests substitute a scripted oracle.
//!
//! ## Provided implementation
//!
//! [`AnalyticEphemeris`](crate::ephemeris::analytic::AnalyticEphemeris) is a low-precision,
//! self-contained model (a few arcminutes for the planets, a few tenths of a degree for the
//! Moon) valid from 1800 to 2050:
//!
//! 1. **Planets**: J2000 mean Keplerian elements with linear rates
//!    ([`planets`](crate::ephemeris::planets)), one light-time iteration.
//! 2. **Moon**: truncated periodic series in longitude, latitude and distance
//!    ([`moon`](crate::ephemeris::moon)).
//! 3. **Frames**: ecliptic J2000 → equatorial J2000 → mean equator of date (IAU 1976
//!    precession), then topocentric parallax and horizontal coordinates with refraction.
//! 4. **Rise/set**: scan of the geometric altitude against the horizon threshold
//!    `−(34′ + semidiameter)`, bracketed crossings refined with Brent's method.
//!
//! ## Errors
//!
//! Implementations report failures per call as [`SkyError`]; the classifier isolates them
//! per body.
//!
//! ## See also
//! ------------
//! * [`crate::visibility::VisibilityClassifier`] – Main consumer of the oracle.
//! * [`magnitude`] – Apparent magnitude model used by [`Illumination`].

pub mod analytic;
pub mod magnitude;
pub mod moon;
pub mod planets;

use std::sync::Arc;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::bodies::Body;
use crate::constants::Degree;
use crate::observers::horizon::HorizontalPosition;
use crate::observers::Observer;
use crate::sky_errors::SkyError;

/// Direction of a horizon crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiseSetDirection {
    /// Altitude crosses the horizon ascending.
    Rise,
    /// Altitude crosses the horizon descending.
    Set,
}

/// Brightness and geometry of a body at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Illumination {
    /// Apparent visual magnitude.
    pub magnitude: f64,
    /// Sun–body–Earth angle, degrees.
    pub phase_angle: Degree,
    /// Illuminated fraction of the disc, in [0, 1].
    pub phase_fraction: f64,
    /// Heliocentric distance of the body, AU (0 for the Sun).
    pub helio_distance: f64,
    /// Geocentric distance of the body, AU.
    pub geo_distance: f64,
}

/// Astronomical positions and events for the tracked bodies.
pub trait EphemerisOracle: Send + Sync {
    /// Topocentric azimuth/altitude of `body` at `epoch`, with standard refraction.
    fn horizontal(
        &self,
        body: Body,
        epoch: Epoch,
        observer: &Observer,
    ) -> Result<HorizontalPosition, SkyError>;

    /// First rise or set of `body` strictly after `start` and within `limit_days`.
    ///
    /// Returns `Ok(None)` when no such crossing exists in the window (circumpolar or
    /// never-rising body).
    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: RiseSetDirection,
        start: Epoch,
        limit_days: f64,
    ) -> Result<Option<Epoch>, SkyError>;

    /// Magnitude and phase geometry of `body` at `epoch`.
    fn illumination(&self, body: Body, epoch: Epoch) -> Result<Illumination, SkyError>;

    /// Geocentric ecliptic longitude of the Moon minus that of the Sun, degrees in [0, 360).
    fn moon_phase(&self, epoch: Epoch) -> Result<Degree, SkyError>;
}

impl<O: EphemerisOracle + ?Sized> EphemerisOracle for Arc<O> {
    fn horizontal(
        &self,
        body: Body,
        epoch: Epoch,
        observer: &Observer,
    ) -> Result<HorizontalPosition, SkyError> {
        (**self).horizontal(body, epoch, observer)
    }

    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: RiseSetDirection,
        start: Epoch,
        limit_days: f64,
    ) -> Result<Option<Epoch>, SkyError> {
        (**self).search_rise_set(body, observer, direction, start, limit_days)
    }

    fn illumination(&self, body: Body, epoch: Epoch) -> Result<Illumination, SkyError> {
        (**self).illumination(body, epoch)
    }

    fn moon_phase(&self, epoch: Epoch) -> Result<Degree, SkyError> {
        (**self).moon_phase(epoch)
    }
}
