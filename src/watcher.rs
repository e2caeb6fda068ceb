//! # Refresh loop
//!
//! [`SkyWatcher`] owns the refresh policy around a [`VisibilityClassifier`]: it
//! re-classifies on a fixed poll interval, immediately when the observer location changes,
//! and on explicit request. Results are published as [`SkyState`] snapshots on a
//! `tokio::sync::watch` channel.
//!
//! ## Scheduling
//!
//! * The loop runs on the tokio runtime; each classification runs on the blocking pool
//!   since it is CPU-bound.
//! * Every computation is tagged with a generation number taken when it starts. A result
//!   is published only if no newer computation has started since, so a slow cycle for an
//!   old location never overwrites a fresher one.
//! * A denied location permission publishes [`SkyState::PermissionRequired`] and skips the
//!   classifier until a location is granted.
//! * Cancelling the handle stops the loop; in-flight computations finish but their results
//!   are dropped.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use hifitime::Epoch;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::ephemeris::EphemerisOracle;
use crate::moon_phase::MoonPhaseName;
use crate::observers::Observer;
use crate::sky_errors::SkyError;
use crate::time::Clock;
use crate::visibility::{VisibilityClassifier, VisibilityResult};

/// Outcome of a location request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationStatus {
    Granted(Observer),
    Denied,
}

/// One published classification.
#[derive(Debug, Clone, PartialEq)]
pub struct SkySnapshot {
    pub generation: u64,
    pub computed_at: Epoch,
    pub observer: Observer,
    pub result: VisibilityResult,
    /// `None` when the phase could not be computed.
    pub moon_phase: Option<MoonPhaseName>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SkyState {
    /// No location received yet.
    #[default]
    Pending,
    /// The location permission was denied; nothing is computed.
    PermissionRequired,
    Ready(Arc<SkySnapshot>),
}

/// State shared between the loop, its computations and the handle.
struct Shared {
    latest_generation: AtomicU64,
    cancelled: AtomicBool,
    state_tx: watch::Sender<SkyState>,
}

impl Shared {
    fn next_generation(&self) -> u64 {
        self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish `snapshot` unless a newer computation started or the loop was cancelled.
    fn publish(&self, snapshot: SkySnapshot) -> bool {
        let generation = snapshot.generation;
        let published = self.state_tx.send_if_modified(|state| {
            if self.cancelled.load(Ordering::SeqCst)
                || generation < self.latest_generation.load(Ordering::SeqCst)
            {
                return false;
            }
            *state = SkyState::Ready(Arc::new(snapshot));
            true
        });
        if !published {
            debug!(generation, "discarding stale sky snapshot");
        }
        published
    }

    /// Publish [`SkyState::PermissionRequired`] unless the loop was cancelled.
    fn require_permission(&self) -> bool {
        self.state_tx.send_if_modified(|state| {
            if self.cancelled.load(Ordering::SeqCst) || *state == SkyState::PermissionRequired {
                return false;
            }
            *state = SkyState::PermissionRequired;
            true
        })
    }
}

pub struct SkyWatcher<O: EphemerisOracle + 'static> {
    classifier: Arc<VisibilityClassifier<O>>,
    clock: Arc<dyn Clock>,
    poll_interval: StdDuration,
}

impl<O: EphemerisOracle + 'static> SkyWatcher<O> {
    pub fn new(
        classifier: VisibilityClassifier<O>,
        clock: Arc<dyn Clock>,
        poll_interval: StdDuration,
    ) -> Self {
        SkyWatcher {
            classifier: Arc::new(classifier),
            clock,
            poll_interval,
        }
    }

    /// Start the loop on the current tokio runtime.
    ///
    /// With an initial location the first classification starts right away.
    pub fn spawn(self, initial: Option<LocationStatus>) -> WatcherHandle {
        let (state_tx, state_rx) = watch::channel(SkyState::Pending);
        let (location_tx, location_rx) = watch::channel(initial);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let refresh = Arc::new(Notify::new());

        let shared = Arc::new(Shared {
            latest_generation: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            state_tx,
        });

        let task = tokio::spawn(self.run(
            Arc::clone(&shared),
            location_rx,
            shutdown_rx,
            Arc::clone(&refresh),
        ));

        WatcherHandle {
            shared,
            state_rx,
            location_tx,
            shutdown_tx,
            refresh,
            task,
        }
    }

    async fn run(
        self,
        shared: Arc<Shared>,
        mut location_rx: watch::Receiver<Option<LocationStatus>>,
        mut shutdown_rx: watch::Receiver<bool>,
        refresh: Arc<Notify>,
    ) {
        info!(
            "Starting sky watcher (interval: {} s)",
            self.poll_interval.as_secs_f64()
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                    continue;
                }
                changed = location_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!("observer location changed");
                    ticker.reset();
                }
                _ = ticker.tick() => {
                    debug!("scheduled sky refresh");
                }
                _ = refresh.notified() => {
                    debug!("sky refresh requested");
                }
            }

            let status = location_rx.borrow_and_update().clone();
            match status {
                None => {}
                Some(LocationStatus::Denied) => {
                    // invalidate anything still running for a previous location
                    shared.next_generation();
                    shared.require_permission();
                }
                Some(LocationStatus::Granted(observer)) => {
                    self.start_cycle(&shared, observer);
                }
            }
        }

        info!("Sky watcher stopped");
    }

    fn start_cycle(&self, shared: &Arc<Shared>, observer: Observer) {
        let computed_at = match self.clock.now() {
            Ok(now) => now,
            Err(err) => {
                warn!(error = %err, "cannot read the clock, skipping this refresh");
                return;
            }
        };

        let generation = shared.next_generation();
        let classifier = Arc::clone(&self.classifier);
        let shared = Arc::clone(shared);

        tokio::spawn(async move {
            let computation = tokio::task::spawn_blocking(move || {
                let result = classifier.classify(&observer, computed_at);
                let moon_phase = match MoonPhaseName::at(classifier.oracle(), computed_at) {
                    Ok(phase) => Some(phase),
                    Err(err) => {
                        warn!(error = %err, "moon phase unavailable");
                        None
                    }
                };
                SkySnapshot {
                    generation,
                    computed_at,
                    observer,
                    result,
                    moon_phase,
                }
            })
            .await;

            match computation {
                Ok(snapshot) => {
                    if shared.publish(snapshot) {
                        debug!(generation, "sky snapshot published");
                    }
                }
                Err(err) => warn!(generation, error = %err, "sky computation aborted"),
            }
        });
    }
}

/// Control side of a running [`SkyWatcher`].
///
/// Dropping the handle stops the loop as well.
pub struct WatcherHandle {
    shared: Arc<Shared>,
    state_rx: watch::Receiver<SkyState>,
    location_tx: watch::Sender<Option<LocationStatus>>,
    shutdown_tx: watch::Sender<bool>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Latest published state.
    pub fn state(&self) -> SkyState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SkyState> {
        self.state_rx.clone()
    }

    /// Report a new location fix or a permission change; triggers a refresh.
    pub fn set_location(&self, status: LocationStatus) -> Result<(), SkyError> {
        self.location_tx
            .send(Some(status))
            .map_err(|_| SkyError::WatcherClosed)
    }

    /// Request an immediate refresh without waiting for the next tick.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Stop the loop. No snapshot is published afterwards.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        // the loop may already be gone, in which case there is nothing to stop
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Wait for the next `Ready` state, or return the current one if already ready.
    pub async fn ready(&self) -> Result<Arc<SkySnapshot>, SkyError> {
        let mut rx = self.state_rx.clone();
        let state = rx
            .wait_for(|state| matches!(state, SkyState::Ready(_)))
            .await
            .map_err(|_| SkyError::WatcherClosed)?;
        match &*state {
            SkyState::Ready(snapshot) => Ok(Arc::clone(snapshot)),
            _ => Err(SkyError::WatcherClosed),
        }
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn shutdown(self) -> Result<(), SkyError> {
        self.cancel();
        self.task.await.map_err(|_| SkyError::WatcherClosed)
    }
}

#[cfg(test)]
mod watcher_test {
    use super::*;

    fn shared() -> (Shared, watch::Receiver<SkyState>) {
        let (state_tx, state_rx) = watch::channel(SkyState::Pending);
        let shared = Shared {
            latest_generation: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            state_tx,
        };
        (shared, state_rx)
    }

    fn snapshot(generation: u64) -> SkySnapshot {
        SkySnapshot {
            generation,
            computed_at: Epoch::from_gregorian_utc_hms(2025, 6, 21, 22, 0, 0),
            observer: Observer::new(-23.5, -46.6, 760.0).unwrap(),
            result: VisibilityResult::default(),
            moon_phase: None,
        }
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let (shared, rx) = shared();
        let old = shared.next_generation();
        let new = shared.next_generation();

        assert!(shared.publish(snapshot(new)));
        assert!(!shared.publish(snapshot(old)));
        match &*rx.borrow() {
            SkyState::Ready(latest) => assert_eq!(latest.generation, new),
            other => panic!("unexpected state {other:?}"),
        };
    }

    #[test]
    fn test_permission_state() {
        let (shared, rx) = shared();
        assert!(shared.require_permission());
        assert_eq!(*rx.borrow(), SkyState::PermissionRequired);
        // repeated denials do not wake subscribers again
        assert!(!shared.require_permission());
    }

    #[test]
    fn test_nothing_published_after_cancel() {
        let (shared, rx) = shared();
        shared.cancelled.store(true, Ordering::SeqCst);

        let generation = shared.next_generation();
        assert!(!shared.require_permission());
        assert!(!shared.publish(snapshot(generation)));
        assert_eq!(*rx.borrow(), SkyState::Pending);
    }
}
