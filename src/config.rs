//! TOML configuration of the sky watcher.
//!
//! Every field is optional in the file; missing keys take the defaults below.
//!
//! ```toml
//! poll_interval_secs = 60
//! soon_window_hours = 12.0
//! search_horizon_days = 1.0
//! utc_offset_minutes = -180
//! locale = "pt-BR"
//! log_level = "info"
//! bodies = ["mercury", "venus", "mars", "jupiter", "saturn", "moon", "sun"]
//! favorites = ["lua", "saturno"]
//!
//! [observer]
//! latitude = -23.5
//! longitude = -46.6
//! altitude = 760.0
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration as StdDuration;

use hifitime::{Duration, Unit};
use serde::{Deserialize, Serialize};

use crate::bodies::{Body, Locale};
use crate::constants::{POLL_INTERVAL_SECS, RISE_SET_SEARCH_DAYS, SOON_WINDOW_HOURS};
use crate::observers::LocationFix;
use crate::sky_errors::SkyError;
use crate::visibility::{parse_favorites, ClassifierSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_soon_window_hours")]
    pub soon_window_hours: f64,

    #[serde(default = "default_search_horizon_days")]
    pub search_horizon_days: f64,

    #[serde(default)]
    pub utc_offset_minutes: i32,

    #[serde(default)]
    pub locale: Locale,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Slugs of the tracked bodies, in evaluation order.
    #[serde(default = "default_bodies")]
    pub bodies: Vec<String>,

    /// Slugs of the user's favorite bodies.
    #[serde(default)]
    pub favorites: Vec<String>,

    #[serde(default)]
    pub observer: Option<LocationFix>,
}

fn default_poll_interval_secs() -> u64 {
    POLL_INTERVAL_SECS
}

fn default_soon_window_hours() -> f64 {
    SOON_WINDOW_HOURS
}

fn default_search_horizon_days() -> f64 {
    RISE_SET_SEARCH_DAYS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bodies() -> Vec<String> {
    Body::TRACKED.iter().map(|body| body.slug()).collect()
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            soon_window_hours: default_soon_window_hours(),
            search_horizon_days: default_search_horizon_days(),
            utc_offset_minutes: 0,
            locale: Locale::default(),
            log_level: default_log_level(),
            bodies: default_bodies(),
            favorites: Vec::new(),
            observer: None,
        }
    }
}

impl SkyConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SkyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SkyError> {
        let config: SkyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SkyError> {
        if self.poll_interval_secs == 0 {
            return Err(SkyError::InvalidConfig(
                "poll_interval_secs must be positive".into(),
            ));
        }
        if !(self.soon_window_hours.is_finite() && self.soon_window_hours > 0.0) {
            return Err(SkyError::InvalidConfig(format!(
                "soon_window_hours {} must be a positive number",
                self.soon_window_hours
            )));
        }
        if !(self.search_horizon_days.is_finite() && self.search_horizon_days > 0.0) {
            return Err(SkyError::InvalidConfig(format!(
                "search_horizon_days {} must be a positive number",
                self.search_horizon_days
            )));
        }
        if self.utc_offset_minutes.abs() > 14 * 60 {
            return Err(SkyError::InvalidConfig(format!(
                "utc_offset_minutes {} outside ±14 h",
                self.utc_offset_minutes
            )));
        }
        self.tracked_bodies().map(|_| ())
    }

    pub fn poll_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.poll_interval_secs)
    }

    pub fn utc_offset(&self) -> Duration {
        Unit::Minute * self.utc_offset_minutes as i64
    }

    /// Tracked bodies resolved from their slugs, duplicates removed.
    pub fn tracked_bodies(&self) -> Result<Vec<Body>, SkyError> {
        let mut seen = BTreeSet::new();
        let mut bodies = Vec::with_capacity(self.bodies.len());
        for slug in &self.bodies {
            let body = Body::from_slug(slug)?;
            if seen.insert(body) {
                bodies.push(body);
            }
        }
        Ok(bodies)
    }

    pub fn favorite_bodies(&self) -> BTreeSet<Body> {
        parse_favorites(&self.favorites)
    }

    /// Classifier tunables derived from this configuration.
    pub fn settings(&self) -> Result<ClassifierSettings, SkyError> {
        Ok(ClassifierSettings {
            soon_window: Unit::Hour * self.soon_window_hours,
            search_horizon_days: self.search_horizon_days,
            utc_offset: self.utc_offset(),
            locale: self.locale,
            bodies: self.tracked_bodies()?,
        })
    }
}
