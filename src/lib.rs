//! # skywatch
//!
//! Which of the Sun, the Moon and the five naked-eye planets can be seen from a place,
//! right now or within the next hours.
//!
//! ## Entry points
//!
//! * [`VisibilityClassifier`] – One synchronous classification cycle: splits the tracked
//!   bodies into *visible now* and *visible soon*, with display captions, sorted by the
//!   time left until their set or rise.
//! * [`SkyWatcher`] – Tokio refresh loop around the classifier: periodic poll, immediate
//!   recompute on location change, last result wins, cancellable through its
//!   [`WatcherHandle`].
//! * [`AnalyticEphemeris`] – Default [`EphemerisOracle`], a low-precision analytic model
//!   valid 1800–2050.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hifitime::Epoch;
//! use skywatch::{AnalyticEphemeris, ClassifierSettings, Observer, VisibilityClassifier};
//!
//! let observer = Observer::new(-23.5, -46.6, 760.0)?;
//! let classifier = VisibilityClassifier::new(AnalyticEphemeris::new(), ClassifierSettings::default());
//! let result = classifier.classify(&observer, Epoch::from_gregorian_utc_hms(2025, 6, 21, 23, 0, 0));
//! for entry in &result.now {
//!     println!("{} {}", entry.body, entry.display_time);
//! }
//! # Ok::<(), skywatch::SkyError>(())
//! ```

pub mod bodies;
pub mod config;
pub mod constants;
pub mod earth_orientation;
pub mod ephemeris;
mod kepler;
pub mod logging;
pub mod moon_phase;
pub mod observers;
pub mod projection;
mod ref_system;
pub mod sky_errors;
pub mod time;
pub mod visibility;
pub mod watcher;

pub use ephemeris::analytic::AnalyticEphemeris;
pub use ephemeris::EphemerisOracle;
pub use observers::Observer;
pub use sky_errors::SkyError;
pub use visibility::{ClassifierSettings, VisibilityClassifier, VisibilityResult};
pub use watcher::{LocationStatus, SkyState, SkyWatcher, WatcherHandle};
