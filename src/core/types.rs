//! Core data types for the overlay engine

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Absolute geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude above the reference ellipsoid in meters
    pub altitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// True when all components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

/// Position of a target relative to the viewer, in a local spherical frame.
///
/// Azimuth 0 points toward geographic north and increases clockwise;
/// inclination is the signed elevation angle, positive above the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarCoordinate {
    /// Straight-line distance to the target in meters
    pub distance: f64,
    /// Signed elevation angle in radians
    pub inclination: f64,
    /// Compass bearing in radians, normalized to [0, 2π)
    pub azimuth: f64,
}

impl PolarCoordinate {
    pub fn new(distance: f64, inclination: f64, azimuth: f64) -> Self {
        Self {
            distance,
            inclination,
            azimuth,
        }
    }
}

/// The device's current look direction, fused from compass and accelerometer.
///
/// Conceptually a polar coordinate at distance zero: the viewer's eye.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceOrientation {
    /// Compass azimuth in radians, [0, 2π)
    pub azimuth: f64,
    /// Device tilt in radians, derived from the gravity vector
    pub inclination: f64,
}

/// Angular extent of the camera's field of view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    /// Horizontal angular width in radians
    pub width: f64,
    /// Vertical angular height in radians
    pub height: f64,
}

impl FieldOfView {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pixel dimensions of the overlay surface owned by the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point on the overlay surface, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle on the overlay surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered_on(center: ScreenPoint, width: f64, height: f64) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// Center point of the rectangle
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Wrap an angle into [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = 2.0 * PI;
    let wrapped = angle % two_pi;
    if wrapped < 0.0 {
        wrapped + two_pi
    } else {
        wrapped
    }
}
