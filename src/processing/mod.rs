//! Orientation fusion and tracked-point projection

pub mod orientation;
pub mod tracked_point;

pub use orientation::OrientationTracker;
pub use tracked_point::{marker_transform, scale_factor, TrackedPoint};
