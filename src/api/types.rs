//! Common API types and data structures

use crate::core::types::ScreenRect;
use nalgebra::Matrix4;
use std::fmt;

/// Result type for overlay API operations
pub type OverlayResult<T> = Result<T, OverlayError>;

/// API error types
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// Invalid configuration value
    ConfigurationError {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Callback or point handle that was never issued or already removed
    InvalidHandle { reason: String },
    /// Operation requires an active monitoring runtime
    NotMonitoring,
    /// The runtime worker is gone and cannot accept events
    RuntimeStopped,
    /// Configuration file I/O failure
    IoError { message: String },
    /// Configuration serialization failure
    SerializationError { message: String },
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::ConfigurationError {
                parameter,
                value,
                reason,
            } => write!(
                f,
                "invalid configuration: {} = {} ({})",
                parameter, value, reason
            ),
            OverlayError::InvalidHandle { reason } => write!(f, "invalid handle: {}", reason),
            OverlayError::NotMonitoring => write!(f, "monitoring is not active"),
            OverlayError::RuntimeStopped => write!(f, "overlay runtime has stopped"),
            OverlayError::IoError { message } => write!(f, "config I/O error: {}", message),
            OverlayError::SerializationError { message } => {
                write!(f, "config serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for OverlayError {}

/// Identifier for a tracked point within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointId(u32);

impl PointId {
    pub(crate) fn new(id: u32) -> Self {
        PointId(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Handle for a registered marker callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub(crate) fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Placement data for one visible marker, handed to the renderer each tick
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerUpdate {
    /// Which tracked point this placement belongs to
    pub point_id: PointId,
    /// Display label, if the point carries one
    pub label: Option<String>,
    /// Screen rectangle for the marker view, already scaled and centered on
    /// the projected point
    pub rect: ScreenRect,
    /// Rotation about the screen vertical axis (radians)
    pub rotation: f64,
    /// Distance-based scale factor in [min_scale_factor, 1.0]
    pub scale: f64,
    /// Full homogeneous transform combining scale, perspective and rotation
    pub transform: Matrix4<f64>,
}

/// Per-point output of a refresh tick
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerEvent {
    /// The point is inside the field of view; place or move its marker
    Place(MarkerUpdate),
    /// The point left the field of view; remove its marker and reset its
    /// transform. Emitted every tick the point stays out of view.
    Hide { point_id: PointId },
}

/// Callback invoked for every marker event produced by a refresh tick
pub type MarkerCallback = Box<dyn Fn(&MarkerEvent) + Send>;

/// Session state information
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Number of tracked points in the working set
    pub tracked_points: usize,
    /// Refresh ticks executed so far
    pub ticks: u64,
    /// Timestamp of the last accepted location fix (ms since epoch)
    pub last_fix_time_ms: Option<u64>,
    /// Largest recalibrated distance observed so far (monotonic)
    pub max_observed_distance: f64,
    /// Samples rejected for non-finite values
    pub rejected_samples: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = OverlayError::ConfigurationError {
            parameter: "fov_width".to_string(),
            value: "-1".to_string(),
            reason: "must be positive".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("fov_width"));
        assert!(text.contains("must be positive"));
    }

    #[test]
    fn test_handles_compare_by_id() {
        assert_eq!(PointId::new(3), PointId::new(3));
        assert_ne!(CallbackHandle::new(1), CallbackHandle::new(2));
    }
}
