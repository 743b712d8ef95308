//! Augmented-Reality Geo Overlay Engine
//!
//! Positions geo-referenced points of interest on a live camera overlay,
//! combining the device's location, compass heading and tilt into per-marker
//! screen rectangles and 3D transforms.

pub mod algorithms;
pub mod api;
pub mod core;
pub mod processing;
pub mod sensors;
pub mod utils;

// Re-export commonly used types
pub use algorithms::geodesy::{Haversine, HorizontalDistance};
pub use api::{
    MarkerCallback, MarkerEvent, MarkerUpdate, MonitorHandle, OverlayError, OverlayResult,
    OverlaySession, PointId, SessionState,
};
pub use crate::core::types::{
    FieldOfView, GeoLocation, PolarCoordinate, ReferenceOrientation, ScreenPoint, ScreenRect,
    Viewport,
};
pub use processing::orientation::OrientationTracker;
pub use processing::tracked_point::TrackedPoint;
pub use sensors::{
    AccelerometerSample, HeadingSample, LocationFix, MockSensorFeed, SensorEvent,
};
pub use utils::config::OverlayConfig;
