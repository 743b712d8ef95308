//! Device orientation fusion from compass and accelerometer samples
//!
//! The tracker fuses two independent sensor streams into one reference
//! orientation: the compass heading replaces the azimuth outright, while the
//! accelerometer feeds an exponential low-pass filter whose smoothed gravity
//! vector yields the device tilt. The rolling filter is the only smoothing in
//! the whole pipeline; its state persists across samples and is cleared only
//! when monitoring restarts.

use crate::core::types::ReferenceOrientation;
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};

/// Fuses heading and accelerometer samples into the device's look direction
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    reference: ReferenceOrientation,
    /// Smoothed gravity component fed from the accelerometer y axis.
    /// The axis relabeling is deliberate: with the device held upright in
    /// portrait, the y sample carries the tilt signal.
    rolling_x: f64,
    /// Smoothed gravity component along the device z axis
    rolling_z: f64,
    filter_factor: f64,
}

impl OrientationTracker {
    /// Create a tracker with the given low-pass filter factor in (0, 1]
    pub fn new(filter_factor: f64) -> Self {
        Self {
            reference: ReferenceOrientation::default(),
            rolling_x: 0.0,
            rolling_z: 0.0,
            filter_factor,
        }
    }

    /// Current fused orientation snapshot
    pub fn orientation(&self) -> ReferenceOrientation {
        self.reference
    }

    /// Ingest a magnetic heading sample in degrees, [0, 360).
    ///
    /// Replaces the reference azimuth outright; headings are not smoothed.
    pub fn on_heading_sample(&mut self, magnetic_heading_deg: f64) {
        self.reference.azimuth = (magnetic_heading_deg % 360.0) * (PI / 180.0);
    }

    /// Ingest a raw accelerometer sample in g-units.
    ///
    /// Updates the rolling gravity estimate and rederives the reference
    /// inclination from it. The case analysis on the sign of the smoothed z
    /// component keeps the angle continuous through the vertical.
    pub fn on_accelerometer_sample(&mut self, acceleration: &Vector3<f64>) {
        let factor = self.filter_factor;
        self.rolling_z = acceleration.z * factor + self.rolling_z * (1.0 - factor);
        self.rolling_x = acceleration.y * factor + self.rolling_x * (1.0 - factor);

        self.reference.inclination = if self.rolling_z > 0.0 {
            (self.rolling_x / self.rolling_z).atan() + FRAC_PI_2
        } else if self.rolling_z < 0.0 {
            (self.rolling_x / self.rolling_z).atan() - FRAC_PI_2
        } else if self.rolling_x < 0.0 {
            FRAC_PI_2
        } else {
            3.0 * FRAC_PI_2
        };
    }

    /// Update the filter factor for subsequent samples
    pub fn set_filter_factor(&mut self, filter_factor: f64) {
        self.filter_factor = filter_factor;
    }

    /// Clear the rolling filter state and the fused orientation
    pub fn reset(&mut self) {
        self.reference = ReferenceOrientation::default();
        self.rolling_x = 0.0;
        self.rolling_z = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_conversion() {
        let mut tracker = OrientationTracker::new(0.05);

        tracker.on_heading_sample(0.0);
        assert_eq!(tracker.orientation().azimuth, 0.0);

        tracker.on_heading_sample(90.0);
        assert!((tracker.orientation().azimuth - FRAC_PI_2).abs() < 1e-12);

        tracker.on_heading_sample(359.0);
        assert!((tracker.orientation().azimuth - 359.0_f64.to_radians()).abs() < 1e-12);

        // Values past a full turn wrap
        tracker.on_heading_sample(450.0);
        assert!((tracker.orientation().azimuth - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_filter_convergence() {
        let mut tracker = OrientationTracker::new(0.05);

        // Device held with gravity along -z, no tilt signal
        let gravity = Vector3::new(0.0, 0.0, -1.0);
        for _ in 0..500 {
            tracker.on_accelerometer_sample(&gravity);
        }

        // rolling_x ≈ 0, rolling_z ≈ -1: inclination converges to atan(0) − π/2
        assert!((tracker.orientation().inclination + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_filter_smooths_spikes() {
        let mut tracker = OrientationTracker::new(0.05);

        let steady = Vector3::new(0.0, 0.0, -1.0);
        for _ in 0..200 {
            tracker.on_accelerometer_sample(&steady);
        }
        let before = tracker.orientation().inclination;

        // A single spiked sample barely moves the smoothed estimate
        tracker.on_accelerometer_sample(&Vector3::new(0.0, 1.0, 1.0));
        let after = tracker.orientation().inclination;
        assert!((after - before).abs() < 0.2);
    }

    #[test]
    fn test_vertical_singularity_branches() {
        let mut tracker = OrientationTracker::new(1.0);

        // Filter factor 1.0 makes each sample replace the rolling state
        tracker.on_accelerometer_sample(&Vector3::new(0.0, -0.5, 0.0));
        assert_eq!(tracker.orientation().inclination, FRAC_PI_2);

        tracker.on_accelerometer_sample(&Vector3::new(0.0, 0.5, 0.0));
        // rolling_x is now positive with rolling_z still zero
        assert_eq!(tracker.orientation().inclination, 3.0 * FRAC_PI_2);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut tracker = OrientationTracker::new(0.5);
        tracker.on_heading_sample(180.0);
        tracker.on_accelerometer_sample(&Vector3::new(0.0, 0.3, 0.8));

        tracker.reset();
        let reference = tracker.orientation();
        assert_eq!(reference.azimuth, 0.0);
        assert_eq!(reference.inclination, 0.0);

        // After reset, the filter starts over from zero state
        tracker.on_accelerometer_sample(&Vector3::new(0.0, 0.0, 1.0));
        assert!(tracker.orientation().inclination > 0.0);
    }
}
