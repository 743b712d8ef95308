//! Sensor sample types and the event fan-in consumed by the overlay runtime
//!
//! Location, heading and accelerometer sources are external collaborators
//! that produce samples on their own schedules. Each source wraps its samples
//! in a [`SensorEvent`] and pushes them into the runtime's channel; all
//! mutation of overlay state happens on the runtime thread.

pub mod mock;

use crate::core::types::GeoLocation;
use nalgebra::Vector3;

pub use mock::MockSensorFeed;

/// One device location fix from the location source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub location: GeoLocation,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl LocationFix {
    pub fn new(location: GeoLocation, timestamp_ms: u64) -> Self {
        Self {
            location,
            timestamp_ms,
        }
    }
}

/// One compass reading from the heading source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    /// Magnetic heading in degrees, [0, 360)
    pub magnetic_heading_deg: f64,
}

impl HeadingSample {
    pub fn new(magnetic_heading_deg: f64) -> Self {
        Self {
            magnetic_heading_deg,
        }
    }
}

/// One raw accelerometer sample in g-units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerometerSample {
    pub acceleration: Vector3<f64>,
}

impl AccelerometerSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            acceleration: Vector3::new(x, y, z),
        }
    }
}

/// Fan-in of the three sensor streams feeding the overlay runtime
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    Location(LocationFix),
    Heading(HeadingSample),
    Accelerometer(AccelerometerSample),
}
