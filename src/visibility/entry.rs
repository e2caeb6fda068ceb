use std::collections::BTreeSet;

use hifitime::Epoch;
use serde::Serialize;
use tracing::warn;

use crate::bodies::{Body, BodyKind, Locale};
use crate::observers::horizon::HorizontalPosition;
use crate::sky_errors::SkyError;
use crate::time::{format_clock, ClockTime};

/// Which list a body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    /// Above the horizon and observable now.
    Now,
    /// Below the horizon, rising within the look-ahead window.
    Soon,
}

impl Classification {
    /// Caption shown under the body name, e.g. `"until 05:12"` or `"Nasce às 18:40"`.
    pub fn caption(&self, locale: Locale, clock: Option<ClockTime>) -> String {
        let time = format_clock(clock);
        match (self, locale) {
            (Classification::Now, Locale::English) => format!("until {time}"),
            (Classification::Soon, Locale::English) => format!("rises at {time}"),
            (Classification::Now, Locale::PortugueseBr) => format!("Até {time}"),
            (Classification::Soon, Locale::PortugueseBr) => format!("Nasce às {time}"),
        }
    }
}

/// One row of the visibility list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityEntry {
    pub body: Body,
    /// Localized caption with the relevant boundary time.
    pub display_time: String,
    pub classification: Classification,
    /// Local clock time of the boundary event (set for `Now`, rise for `Soon`).
    #[serde(skip)]
    pub clock: Option<ClockTime>,
    /// Instant of the boundary event.
    #[serde(skip)]
    pub event: Option<Epoch>,
    pub position: HorizontalPosition,
}

impl VisibilityEntry {
    /// Sort key in minutes, relative to the clock time `now`.
    ///
    /// Entries without an event sort first with key 0.
    pub fn sort_key(&self, now: ClockTime) -> u32 {
        self.clock.map(|c| c.minutes_after(now)).unwrap_or(0)
    }
}

/// Filter applied to the visibility list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BodyFilter {
    #[default]
    All,
    Kind(BodyKind),
    Favorites(BTreeSet<Body>),
}

impl BodyFilter {
    pub fn matches(&self, body: Body) -> bool {
        match self {
            BodyFilter::All => true,
            BodyFilter::Kind(kind) => body.kind() == *kind,
            BodyFilter::Favorites(favorites) => favorites.contains(&body),
        }
    }

    /// Parse a filter label in English or Portuguese (`"planet"`, `"Satélite"`, `"Favoritos"`).
    pub fn parse(label: &str, favorites: BTreeSet<Body>) -> Result<Self, SkyError> {
        match crate::bodies::slugify(label).as_str() {
            "all" | "tudo" => Ok(BodyFilter::All),
            "planet" | "planeta" => Ok(BodyFilter::Kind(BodyKind::Planet)),
            "star" | "estrela" => Ok(BodyFilter::Kind(BodyKind::Star)),
            "satellite" | "satelite" => Ok(BodyFilter::Kind(BodyKind::Satellite)),
            "favorites" | "favoritos" => Ok(BodyFilter::Favorites(favorites)),
            _ => Err(SkyError::InvalidConfig(format!("unknown list filter {label:?}"))),
        }
    }
}

/// Resolve stored favorite slugs, in any locale, to bodies.
///
/// Unknown slugs are logged and ignored.
pub fn parse_favorites<I, S>(slugs: I) -> BTreeSet<Body>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    slugs
        .into_iter()
        .filter_map(|slug| match Body::from_slug(slug.as_ref()) {
            Ok(body) => Some(body),
            Err(err) => {
                warn!(error = %err, "ignoring favorite");
                None
            }
        })
        .collect()
}

/// Alert raised when a favorite body becomes visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteAlert {
    pub body: Body,
    pub title: String,
    pub message: String,
}

impl FavoriteAlert {
    pub fn new(body: Body, locale: Locale) -> Self {
        let name = body.display_name(locale);
        let (title, message) = match locale {
            Locale::English => ("Body visible!".to_string(), format!("{name} is visible now!")),
            Locale::PortugueseBr => (
                "Astro visível!".to_string(),
                format!("{name} está visível agora!"),
            ),
        };
        FavoriteAlert {
            body,
            title,
            message,
        }
    }
}

/// Snapshot of one classification cycle.
///
/// `now` and `soon` are disjoint and each is ordered by the time left until its boundary
/// event.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VisibilityResult {
    pub now: Vec<VisibilityEntry>,
    pub soon: Vec<VisibilityEntry>,
}

impl VisibilityResult {
    pub fn is_empty(&self) -> bool {
        self.now.is_empty() && self.soon.is_empty()
    }

    pub fn classification_of(&self, body: Body) -> Option<Classification> {
        self.now
            .iter()
            .chain(self.soon.iter())
            .find(|entry| entry.body == body)
            .map(|entry| entry.classification)
    }

    /// Entries of `now` whose body is a favorite.
    pub fn visible_favorites(&self, favorites: &BTreeSet<Body>) -> Vec<&VisibilityEntry> {
        self.now
            .iter()
            .filter(|entry| favorites.contains(&entry.body))
            .collect()
    }

    /// Alerts for every favorite currently visible.
    pub fn favorite_alerts(&self, favorites: &BTreeSet<Body>, locale: Locale) -> Vec<FavoriteAlert> {
        self.visible_favorites(favorites)
            .into_iter()
            .map(|entry| FavoriteAlert::new(entry.body, locale))
            .collect()
    }

    /// Copy of the result keeping only the bodies accepted by `filter`, order preserved.
    pub fn filtered(&self, filter: &BodyFilter) -> VisibilityResult {
        let keep = |entries: &[VisibilityEntry]| -> Vec<VisibilityEntry> {
            entries
                .iter()
                .filter(|entry| filter.matches(entry.body))
                .cloned()
                .collect()
        };
        VisibilityResult {
            now: keep(&self.now),
            soon: keep(&self.soon),
        }
    }
}

#[cfg(test)]
mod entry_test {
    use super::*;

    fn entry(body: Body, classification: Classification, clock: Option<ClockTime>) -> VisibilityEntry {
        VisibilityEntry {
            body,
            display_time: classification.caption(Locale::English, clock),
            classification,
            clock,
            event: None,
            position: HorizontalPosition {
                azimuth: 0.0,
                altitude: 10.0,
            },
        }
    }

    fn sample() -> VisibilityResult {
        VisibilityResult {
            now: vec![
                entry(Body::Moon, Classification::Now, Some(ClockTime::new(23, 50))),
                entry(Body::Jupiter, Classification::Now, Some(ClockTime::new(2, 10))),
            ],
            soon: vec![entry(Body::Venus, Classification::Soon, Some(ClockTime::new(4, 30)))],
        }
    }

    #[test]
    fn test_captions() {
        let clock = Some(ClockTime::new(5, 7));
        assert_eq!(Classification::Now.caption(Locale::English, clock), "until 05:07");
        assert_eq!(Classification::Soon.caption(Locale::English, clock), "rises at 05:07");
        assert_eq!(Classification::Now.caption(Locale::PortugueseBr, None), "Até --:--");
        assert_eq!(
            Classification::Soon.caption(Locale::PortugueseBr, clock),
            "Nasce às 05:07"
        );
    }

    #[test]
    fn test_sort_key_wraps_midnight() {
        let now = ClockTime::new(22, 0);
        let late = entry(Body::Mars, Classification::Now, Some(ClockTime::new(23, 50)));
        let early = entry(Body::Saturn, Classification::Now, Some(ClockTime::new(0, 10)));
        let none = entry(Body::Sun, Classification::Now, None);
        assert!(late.sort_key(now) < early.sort_key(now));
        assert_eq!(none.sort_key(now), 0);
    }

    #[test]
    fn test_filters() {
        let result = sample();

        let planets = result.filtered(&BodyFilter::Kind(BodyKind::Planet));
        assert_eq!(planets.now.len(), 1);
        assert_eq!(planets.now[0].body, Body::Jupiter);
        assert_eq!(planets.soon.len(), 1);

        let favorites = BodyFilter::Favorites(BTreeSet::from([Body::Moon]));
        let only_moon = result.filtered(&favorites);
        assert_eq!(only_moon.now.len(), 1);
        assert!(only_moon.soon.is_empty());

        assert_eq!(result.filtered(&BodyFilter::All), result);
    }

    #[test]
    fn test_filter_labels() {
        assert_eq!(
            BodyFilter::parse("Satélite", BTreeSet::new()).unwrap(),
            BodyFilter::Kind(BodyKind::Satellite)
        );
        assert_eq!(BodyFilter::parse("Tudo", BTreeSet::new()).unwrap(), BodyFilter::All);
        assert!(BodyFilter::parse("comet", BTreeSet::new()).is_err());
    }

    #[test]
    fn test_visible_favorites_and_alerts() {
        let result = sample();
        let favorites = parse_favorites(["lua", "vênus", "plutão"]);
        assert_eq!(favorites, BTreeSet::from([Body::Moon, Body::Venus]));

        // Venus is only rising soon: no alert
        let visible = result.visible_favorites(&favorites);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].body, Body::Moon);

        let alerts = result.favorite_alerts(&favorites, Locale::PortugueseBr);
        assert_eq!(alerts[0].title, "Astro visível!");
        assert_eq!(alerts[0].message, "Lua está visível agora!");
        assert_eq!(result.classification_of(Body::Venus), Some(Classification::Soon));
        assert_eq!(result.classification_of(Body::Mars), None);
    }
}
