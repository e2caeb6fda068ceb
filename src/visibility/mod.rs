//! # Visibility classification
//!
//! Decides, for an observer and an instant, which tracked bodies are **visible now** and
//! which will **rise soon**, and produces the display-ready, time-ordered lists shown by
//! the application.
//!
//! ## Algorithm
//!
//! 1. **Daylight context**: the Sun's altitude gives `is_daytime` (altitude > 0); its next
//!    set within the search horizon gives `sunset`, and `is_night` holds when the instant
//!    is past that sunset.
//! 2. For each tracked body: current horizontal position, next rise and next set.
//! 3. First matching rule wins:
//!    * **Now**: altitude > 0 and (not daytime, or the body is the Sun or the Moon);
//!    * **Soon**: altitude ≤ 0, both rise and set exist, the rise is less than the look-ahead
//!      window away, and (no sunset, or rise after sunset, or night, or Sun/Moon);
//!    * otherwise the body is left out.
//! 4. Each list is sorted by local clock time of its boundary event (set for `now`, rise
//!    for `soon`); clock times earlier than the current one count as the next day.
//!
//! ## Errors
//!
//! A failing body is logged with `tracing::warn!` and omitted; the cycle never aborts.
//! When the Sun itself cannot be evaluated the cycle proceeds with `is_daytime = false`
//! and no sunset.
//!
//! Since the sunset is searched forward from the instant being classified, `is_night`
//! can only hold when the search start is later than that instant; it is kept as a
//! separate clause so that an oracle returning past events is handled consistently.
//!
//! ## See also
//! ------------
//! * [`EphemerisOracle`] – Positions and rise/set events.
//! * [`VisibilityResult`] – Snapshot with favorites and filter helpers.

pub mod entry;

pub use entry::{
    parse_favorites, BodyFilter, Classification, FavoriteAlert, VisibilityEntry, VisibilityResult,
};

use hifitime::{Duration, Epoch, Unit};
use itertools::{Either, Itertools};
use tracing::{debug, warn};

use crate::bodies::{Body, Locale};
use crate::constants::{RISE_SET_SEARCH_DAYS, SOON_WINDOW_HOURS};
use crate::ephemeris::{EphemerisOracle, RiseSetDirection};
use crate::observers::Observer;
use crate::sky_errors::SkyError;
use crate::time::ClockTime;

/// Tunables of a classification cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    /// A below-horizon body qualifies as `Soon` when it rises within this window.
    pub soon_window: Duration,
    /// Forward search limit for rise and set events, days.
    pub search_horizon_days: f64,
    /// Offset of the displayed wall clock from UTC.
    pub utc_offset: Duration,
    pub locale: Locale,
    /// Bodies evaluated, in evaluation order.
    pub bodies: Vec<Body>,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        ClassifierSettings {
            soon_window: Unit::Hour * SOON_WINDOW_HOURS,
            search_horizon_days: RISE_SET_SEARCH_DAYS,
            utc_offset: Duration::ZERO,
            locale: Locale::default(),
            bodies: Body::TRACKED.to_vec(),
        }
    }
}

/// Sun-derived context shared by every body of a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaylightContext {
    pub is_daytime: bool,
    pub sunset: Option<Epoch>,
    pub is_night: bool,
}

pub struct VisibilityClassifier<O: EphemerisOracle> {
    oracle: O,
    settings: ClassifierSettings,
}

impl<O: EphemerisOracle> VisibilityClassifier<O> {
    pub fn new(oracle: O, settings: ClassifierSettings) -> Self {
        VisibilityClassifier { oracle, settings }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Evaluate the Sun at `as_of`.
    ///
    /// Failures degrade to "not daytime, no sunset" and are logged.
    pub fn daylight(&self, observer: &Observer, as_of: Epoch) -> DaylightContext {
        let is_daytime = match self.oracle.horizontal(Body::Sun, as_of, observer) {
            Ok(sun) => sun.altitude > 0.0,
            Err(err) => {
                warn!(error = %err, "sun position unavailable, assuming night sky");
                false
            }
        };

        let sunset = match self.oracle.search_rise_set(
            Body::Sun,
            observer,
            RiseSetDirection::Set,
            as_of,
            self.settings.search_horizon_days,
        ) {
            Ok(sunset) => sunset,
            Err(err) => {
                warn!(error = %err, "sunset search failed");
                None
            }
        };

        DaylightContext {
            is_daytime,
            sunset,
            is_night: sunset.is_some_and(|set| as_of > set),
        }
    }

    /// Classify one body. `Ok(None)` means the body is in neither list.
    pub fn evaluate(
        &self,
        body: Body,
        observer: &Observer,
        as_of: Epoch,
        daylight: &DaylightContext,
    ) -> Result<Option<VisibilityEntry>, SkyError> {
        let position = self.oracle.horizontal(body, as_of, observer)?;
        let horizon = self.settings.search_horizon_days;
        let rise =
            self.oracle
                .search_rise_set(body, observer, RiseSetDirection::Rise, as_of, horizon)?;
        let set =
            self.oracle
                .search_rise_set(body, observer, RiseSetDirection::Set, as_of, horizon)?;

        let classification = if position.altitude > 0.0
            && (!daylight.is_daytime || body.is_luminary())
        {
            Some((Classification::Now, set))
        } else if let (true, Some(rise_time), Some(_)) = (position.altitude <= 0.0, rise, set) {
            let rises_in_window = rise_time - as_of < self.settings.soon_window;
            let dark_enough = match daylight.sunset {
                None => true,
                Some(sunset) => rise_time > sunset || daylight.is_night || body.is_luminary(),
            };
            (rises_in_window && dark_enough).then_some((Classification::Soon, rise))
        } else {
            None
        };

        Ok(classification.map(|(classification, event)| {
            let clock = event.map(|e| ClockTime::from_epoch(e, self.settings.utc_offset));
            VisibilityEntry {
                body,
                display_time: classification.caption(self.settings.locale, clock),
                classification,
                clock,
                event,
                position,
            }
        }))
    }

    /// Run a full classification cycle.
    pub fn classify(&self, observer: &Observer, as_of: Epoch) -> VisibilityResult {
        let daylight = self.daylight(observer, as_of);
        debug!(
            is_daytime = daylight.is_daytime,
            is_night = daylight.is_night,
            sunset = ?daylight.sunset,
            "daylight context"
        );

        let (mut now, mut soon): (Vec<_>, Vec<_>) = self
            .settings
            .bodies
            .iter()
            .filter_map(
                |&body| match self.evaluate(body, observer, as_of, &daylight) {
                    Ok(entry) => entry,
                    Err(err) => {
                        warn!(%body, error = %err, "excluding body from this cycle");
                        None
                    }
                },
            )
            .partition_map(|entry| match entry.classification {
                Classification::Now => Either::Left(entry),
                Classification::Soon => Either::Right(entry),
            });

        let now_clock = ClockTime::from_epoch(as_of, self.settings.utc_offset);
        now.sort_by_key(|entry| entry.sort_key(now_clock));
        soon.sort_by_key(|entry| entry.sort_key(now_clock));

        debug!(now = now.len(), soon = soon.len(), "classification cycle done");

        VisibilityResult { now, soon }
    }
}
