#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use hifitime::{Epoch, Unit};
use skywatch::bodies::Body;
use skywatch::ephemeris::{EphemerisOracle, Illumination, RiseSetDirection};
use skywatch::observers::horizon::HorizontalPosition;
use skywatch::observers::Observer;
use skywatch::sky_errors::SkyError;
use skywatch::visibility::VisibilityEntry;

/// Scripted behavior of one body.
#[derive(Debug, Clone, Default)]
pub struct BodyScript {
    pub altitude: f64,
    /// Rise time, hours after the oracle reference.
    pub rise_in_hours: Option<f64>,
    /// Set time, hours after the oracle reference.
    pub set_in_hours: Option<f64>,
    pub fails: bool,
}

impl BodyScript {
    /// Above the horizon, setting after `set_in_hours` and rising again 12 h later.
    pub fn up(altitude: f64, set_in_hours: f64) -> Self {
        BodyScript {
            altitude,
            rise_in_hours: Some(set_in_hours + 12.0),
            set_in_hours: Some(set_in_hours),
            fails: false,
        }
    }

    pub fn down(altitude: f64, rise_in_hours: f64, set_in_hours: f64) -> Self {
        BodyScript {
            altitude,
            rise_in_hours: Some(rise_in_hours),
            set_in_hours: Some(set_in_hours),
            fails: false,
        }
    }

    pub fn failing() -> Self {
        BodyScript {
            fails: true,
            ..BodyScript::default()
        }
    }
}

/// Deterministic oracle answering from per-body scripts.
///
/// Bodies without a script fail. Observers at `slow_latitude` are answered after `delay`.
pub struct ScriptedOracle {
    pub reference: Epoch,
    pub scripts: HashMap<Body, BodyScript>,
    pub slow_latitude: Option<f64>,
    pub delay: StdDuration,
    pub calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(reference: Epoch, scripts: impl IntoIterator<Item = (Body, BodyScript)>) -> Self {
        ScriptedOracle {
            reference,
            scripts: scripts.into_iter().collect(),
            slow_latitude: None,
            delay: StdDuration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow_for(mut self, latitude: f64, delay: StdDuration) -> Self {
        self.slow_latitude = Some(latitude);
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn script(&self, body: Body) -> Result<&BodyScript, SkyError> {
        match self.scripts.get(&body) {
            Some(script) if !script.fails => Ok(script),
            _ => Err(SkyError::DegenerateGeometry(format!("scripted failure for {body}"))),
        }
    }
}

impl EphemerisOracle for ScriptedOracle {
    fn horizontal(
        &self,
        body: Body,
        _epoch: Epoch,
        observer: &Observer,
    ) -> Result<HorizontalPosition, SkyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.slow_latitude == Some(observer.latitude()) {
            std::thread::sleep(self.delay);
        }
        let script = self.script(body)?;
        Ok(HorizontalPosition {
            azimuth: 180.0,
            altitude: script.altitude,
        })
    }

    fn search_rise_set(
        &self,
        body: Body,
        _observer: &Observer,
        direction: RiseSetDirection,
        _start: Epoch,
        _limit_days: f64,
    ) -> Result<Option<Epoch>, SkyError> {
        let script = self.script(body)?;
        let hours = match direction {
            RiseSetDirection::Rise => script.rise_in_hours,
            RiseSetDirection::Set => script.set_in_hours,
        };
        // whole seconds, so fractional hours land exactly on the minute
        Ok(hours.map(|h| self.reference + Unit::Second * (h * 3600.0).round()))
    }

    fn illumination(&self, body: Body, _epoch: Epoch) -> Result<Illumination, SkyError> {
        self.script(body)?;
        Ok(Illumination {
            magnitude: 0.0,
            phase_angle: 0.0,
            phase_fraction: 1.0,
            helio_distance: 1.0,
            geo_distance: 1.0,
        })
    }

    fn moon_phase(&self, _epoch: Epoch) -> Result<f64, SkyError> {
        Ok(180.0)
    }
}

/// 2025-06-21 22:00 UTC.
pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc_hms(2025, 6, 21, 22, 0, 0)
}

pub fn sao_paulo() -> Observer {
    Observer::new(-23.5, -46.6, 760.0).unwrap()
}

pub fn bodies_of(entries: &[VisibilityEntry]) -> Vec<Body> {
    entries.iter().map(|entry| entry.body).collect()
}
