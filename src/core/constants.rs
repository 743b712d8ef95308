//! Physical constants and default overlay parameters

use std::f64::consts::PI;

/// Mean Earth radius in meters (spherical model)
pub const EARTH_RADIUS_MEAN: f64 = 6_371_000.0;

/// Default display refresh interval (milliseconds)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 50;

/// Default horizontal field of view (radians)
pub const DEFAULT_FOV_WIDTH: f64 = 0.5;

/// Default vertical field of view (radians)
pub const DEFAULT_FOV_HEIGHT: f64 = 0.7392;

/// Default maximum marker rotation about the screen vertical axis (radians)
pub const DEFAULT_MAX_ROTATION_ANGLE: f64 = PI / 6.0;

/// Default lower bound for distance-based marker scaling
pub const DEFAULT_MIN_SCALE_FACTOR: f64 = 0.5;

/// Default low-pass filter factor for accelerometer smoothing
pub const DEFAULT_FILTER_FACTOR: f64 = 0.05;

/// Default base marker width in overlay pixels
pub const DEFAULT_MARKER_WIDTH: f64 = 150.0;

/// Default base marker height in overlay pixels
pub const DEFAULT_MARKER_HEIGHT: f64 = 100.0;

/// Perspective term applied to marker transforms when rotation is enabled
pub const MARKER_PERSPECTIVE: f64 = 1.0 / 300.0;
