//! # Sky projection
//!
//! Geometry that turns horizontal coordinates and raw device sensors into positions on a
//! screen: the compass needle and altitude thermometer sprites, the flat sky map, and the
//! 3D placement of markers in an augmented-reality scene.
//!
//! ## Conventions
//!
//! * Azimuth in degrees clockwise from north, altitude in degrees above the horizon.
//! * Screen coordinates have their origin at the top-left corner, `y` growing downwards.
//! * AR scenes are right-handed and Y-up, with the camera looking along −Z (north).
//!
//! Sprite sheets hold 16 needle frames (every 22.5°) and 12 thermometer frames (every
//! 7.5°), so frame selectors return the quantized angle used to pick the sprite.

use hifitime::Epoch;
use nalgebra::Vector3;
use tracing::warn;

use crate::bodies::Body;
use crate::constants::{Degree, Radian};
use crate::ephemeris::EphemerisOracle;
use crate::observers::horizon::HorizontalPosition;
use crate::observers::Observer;

/// Angular step between two compass-needle sprites.
pub const NEEDLE_STEP: Degree = 22.5;

/// Angular step between two thermometer sprites.
pub const THERMOMETER_STEP: Degree = 7.5;

/// Virtual distance of AR markers from the camera, meters.
pub const AR_DISTANCE: f64 = 5.0;

/// Device heading from the horizontal magnetometer components, degrees in [0, 360).
pub fn heading_from_magnetometer(x: f64, y: f64) -> Degree {
    let heading = (-x).atan2(y).to_degrees();
    if heading < 0.0 {
        heading + 360.0
    } else {
        heading
    }
}

/// Pitch of the device in degrees from its front tilt `beta` in radians.
///
/// 0 when the device points at the ground, 90 when held upright toward the horizon and
/// beyond; clamped to [0, 90].
pub fn normalize_pitch(beta: Radian) -> Degree {
    (90.0 - beta.to_degrees()).clamp(0.0, 90.0)
}

/// Needle sprite angle for a target at `azimuth` seen with the device at `heading`.
pub fn needle_frame(azimuth: Degree, heading: Degree) -> Degree {
    let relative = (azimuth - heading + 360.0).rem_euclid(360.0);
    ((relative / NEEDLE_STEP).round() * NEEDLE_STEP).rem_euclid(360.0)
}

/// Thermometer sprite level for a device pitch in degrees.
///
/// A full 90° reading wraps to frame 0, like the sprite sheet it indexes.
pub fn thermometer_frame(pitch: Degree) -> Degree {
    let clamped = pitch.clamp(0.0, 90.0);
    ((clamped / THERMOMETER_STEP).round() * THERMOMETER_STEP).rem_euclid(90.0)
}

/// Vertical offset of the target marker along a thermometer `height` pixels tall.
pub fn altitude_marker_y(altitude: Degree, height: f64) -> f64 {
    height - (altitude / 90.0) * height
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Place a horizontal position on a flat sky map `width`×`height` pixels.
///
/// Azimuth spans the width linearly, altitude 0–90° spans the height bottom to top.
pub fn map_to_screen(azimuth: Degree, altitude: Degree, width: f64, height: f64) -> ScreenPoint {
    ScreenPoint {
        x: (azimuth / 360.0) * width,
        y: height - (altitude / 90.0) * height,
    }
}

/// Cartesian position in a Y-up AR scene at `radius` from the camera.
///
/// ```text
/// x =  r·cos(alt)·sin(az)
/// y =  r·sin(alt)
/// z = −r·cos(alt)·cos(az)
/// ```
pub fn alt_az_to_cartesian(altitude: Degree, azimuth: Degree, radius: f64) -> Vector3<f64> {
    let (sin_alt, cos_alt) = altitude.to_radians().sin_cos();
    let (sin_az, cos_az) = azimuth.to_radians().sin_cos();
    Vector3::new(
        radius * cos_alt * sin_az,
        radius * sin_alt,
        -radius * cos_alt * cos_az,
    )
}

/// A body placed in the sky view.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyMarker {
    pub body: Body,
    pub position: HorizontalPosition,
    /// Placement in the AR scene at [`AR_DISTANCE`].
    pub scene: Vector3<f64>,
}

/// Markers for every body of `bodies` currently above the horizon.
///
/// Bodies whose position cannot be computed are logged and left out.
pub fn sky_markers<O: EphemerisOracle + ?Sized>(
    oracle: &O,
    observer: &Observer,
    epoch: Epoch,
    bodies: &[Body],
) -> Vec<SkyMarker> {
    bodies
        .iter()
        .filter_map(|&body| match oracle.horizontal(body, epoch, observer) {
            Ok(position) => Some((body, position)),
            Err(err) => {
                warn!(%body, error = %err, "skipping sky marker");
                None
            }
        })
        .filter(|(_, position)| position.is_above_horizon())
        .map(|(body, position)| SkyMarker {
            body,
            position,
            scene: alt_az_to_cartesian(position.altitude, position.azimuth, AR_DISTANCE),
        })
        .collect()
}

#[cfg(test)]
mod projection_test {
    use super::*;
    use crate::ephemeris::{Illumination, RiseSetDirection};
    use crate::sky_errors::SkyError;
    use approx::assert_relative_eq;

    /// Fixed altitudes per body; bodies without one fail.
    struct FixedSky(Vec<(Body, f64)>);

    impl EphemerisOracle for FixedSky {
        fn horizontal(
            &self,
            body: Body,
            _epoch: Epoch,
            _observer: &Observer,
        ) -> Result<HorizontalPosition, SkyError> {
            self.0
                .iter()
                .find(|(b, _)| *b == body)
                .map(|&(_, altitude)| HorizontalPosition {
                    azimuth: 135.0,
                    altitude,
                })
                .ok_or_else(|| SkyError::DegenerateGeometry(body.to_string()))
        }

        fn search_rise_set(
            &self,
            _body: Body,
            _observer: &Observer,
            _direction: RiseSetDirection,
            _start: Epoch,
            _limit_days: f64,
        ) -> Result<Option<Epoch>, SkyError> {
            Ok(None)
        }

        fn illumination(&self, body: Body, _epoch: Epoch) -> Result<Illumination, SkyError> {
            Err(SkyError::DegenerateGeometry(body.to_string()))
        }

        fn moon_phase(&self, _epoch: Epoch) -> Result<Degree, SkyError> {
            Ok(0.0)
        }
    }

    #[test]
    fn test_sky_markers_keep_bodies_above_horizon() {
        let oracle = FixedSky(vec![(Body::Moon, 30.0), (Body::Mars, -3.0)]);
        let observer = Observer::new(-23.5, -46.6, 760.0).unwrap();
        let epoch = Epoch::from_gregorian_utc_hms(2025, 6, 21, 23, 0, 0);

        // Jupiter has no position and is skipped
        let markers = sky_markers(
            &oracle,
            &observer,
            epoch,
            &[Body::Mars, Body::Jupiter, Body::Moon],
        );

        assert_eq!(markers.len(), 1);
        let moon = &markers[0];
        assert_eq!(moon.body, Body::Moon);
        assert_relative_eq!(moon.position.altitude, 30.0);
        assert_relative_eq!(moon.scene.norm(), AR_DISTANCE, epsilon = 1e-12);
        assert_relative_eq!(moon.scene.y, AR_DISTANCE * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_heading() {
        assert_relative_eq!(heading_from_magnetometer(0.0, 1.0), 0.0);
        assert_relative_eq!(heading_from_magnetometer(-1.0, 0.0), 90.0);
        assert_relative_eq!(heading_from_magnetometer(1.0, 0.0), 270.0);
        assert_relative_eq!(heading_from_magnetometer(0.0, -1.0), 180.0);
    }

    #[test]
    fn test_pitch() {
        assert_relative_eq!(normalize_pitch(0.0), 90.0);
        assert_relative_eq!(normalize_pitch(std::f64::consts::FRAC_PI_2), 0.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_pitch(-0.5), 90.0);
        assert_relative_eq!(normalize_pitch(3.0), 0.0);
    }

    #[test]
    fn test_needle_frames() {
        assert_relative_eq!(needle_frame(90.0, 0.0), 90.0);
        assert_relative_eq!(needle_frame(10.0, 350.0), 22.5);
        assert_relative_eq!(needle_frame(355.0, 0.0), 0.0);
        assert_relative_eq!(needle_frame(105.0, 0.0), 112.5);
        assert_relative_eq!(needle_frame(100.0, 0.0), 90.0);
    }

    #[test]
    fn test_thermometer_frames() {
        assert_relative_eq!(thermometer_frame(-10.0), 0.0);
        assert_relative_eq!(thermometer_frame(4.0), 7.5);
        assert_relative_eq!(thermometer_frame(44.0), 45.0);
        assert_relative_eq!(thermometer_frame(90.0), 0.0);
        assert_relative_eq!(thermometer_frame(120.0), 0.0);
    }

    #[test]
    fn test_screen_mapping() {
        let p = map_to_screen(180.0, 45.0, 360.0, 200.0);
        assert_relative_eq!(p.x, 180.0);
        assert_relative_eq!(p.y, 100.0);
        assert_relative_eq!(altitude_marker_y(0.0, 300.0), 300.0);
        assert_relative_eq!(altitude_marker_y(90.0, 300.0), 0.0);
    }

    #[test]
    fn test_ar_cartesian() {
        let north = alt_az_to_cartesian(0.0, 0.0, 5.0);
        assert_relative_eq!(north, Vector3::new(0.0, 0.0, -5.0), epsilon = 1e-12);

        let east = alt_az_to_cartesian(0.0, 90.0, 5.0);
        assert_relative_eq!(east, Vector3::new(5.0, 0.0, 0.0), epsilon = 1e-12);

        let zenith = alt_az_to_cartesian(90.0, 123.0, 5.0);
        assert_relative_eq!(zenith.y, 5.0, epsilon = 1e-12);
        assert_relative_eq!(zenith.norm(), 5.0, epsilon = 1e-12);
    }
}
