//! Overlay configuration with JSON persistence and validation

use crate::api::types::{OverlayError, OverlayResult};
use crate::core::constants::{
    DEFAULT_FILTER_FACTOR, DEFAULT_FOV_HEIGHT, DEFAULT_FOV_WIDTH, DEFAULT_MARKER_HEIGHT,
    DEFAULT_MARKER_WIDTH, DEFAULT_MAX_ROTATION_ANGLE, DEFAULT_MIN_SCALE_FACTOR,
    DEFAULT_REFRESH_INTERVAL_MS,
};
use crate::core::types::FieldOfView;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tunable overlay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Display refresh interval (milliseconds)
    pub frequency_ms: u64,
    /// Horizontal field of view (radians)
    pub fov_width: f64,
    /// Vertical field of view (radians)
    pub fov_height: f64,
    /// Maximum marker rotation about the screen vertical axis (radians)
    pub max_rotation_angle: f64,
    /// Rotate markers toward the viewer
    pub allow_rotate: bool,
    /// Scale markers by distance relative to the farthest point
    pub scale_by_distance: bool,
    /// Lower bound for the distance-based scale factor
    pub min_scale_factor: f64,
    /// Low-pass filter factor for accelerometer smoothing, (0, 1]
    pub filter_factor: f64,
    /// Base marker width in overlay pixels
    pub marker_width: f64,
    /// Base marker height in overlay pixels
    pub marker_height: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            frequency_ms: DEFAULT_REFRESH_INTERVAL_MS,
            fov_width: DEFAULT_FOV_WIDTH,
            fov_height: DEFAULT_FOV_HEIGHT,
            max_rotation_angle: DEFAULT_MAX_ROTATION_ANGLE,
            allow_rotate: true,
            scale_by_distance: false,
            min_scale_factor: DEFAULT_MIN_SCALE_FACTOR,
            filter_factor: DEFAULT_FILTER_FACTOR,
            marker_width: DEFAULT_MARKER_WIDTH,
            marker_height: DEFAULT_MARKER_HEIGHT,
        }
    }
}

impl OverlayConfig {
    /// Angular field of view as a value object
    pub fn fov(&self) -> FieldOfView {
        FieldOfView::new(self.fov_width, self.fov_height)
    }

    /// Refresh tick interval
    pub fn frequency(&self) -> Duration {
        Duration::from_millis(self.frequency_ms)
    }

    /// Check every parameter against its valid range
    pub fn validate(&self) -> OverlayResult<()> {
        if self.frequency_ms == 0 {
            return Err(Self::invalid(
                "frequency_ms",
                self.frequency_ms,
                "must be at least 1",
            ));
        }
        if !(self.fov_width > 0.0 && self.fov_width < 2.0 * PI) {
            return Err(Self::invalid(
                "fov_width",
                self.fov_width,
                "must be in (0, 2\u{3c0})",
            ));
        }
        if !(self.fov_height > 0.0 && self.fov_height < PI) {
            return Err(Self::invalid(
                "fov_height",
                self.fov_height,
                "must be in (0, \u{3c0})",
            ));
        }
        if !(self.max_rotation_angle >= 0.0 && self.max_rotation_angle.is_finite()) {
            return Err(Self::invalid(
                "max_rotation_angle",
                self.max_rotation_angle,
                "must be finite and non-negative",
            ));
        }
        if !(self.min_scale_factor > 0.0 && self.min_scale_factor <= 1.0) {
            return Err(Self::invalid(
                "min_scale_factor",
                self.min_scale_factor,
                "must be in (0, 1]",
            ));
        }
        if !(self.filter_factor > 0.0 && self.filter_factor <= 1.0) {
            return Err(Self::invalid(
                "filter_factor",
                self.filter_factor,
                "must be in (0, 1]",
            ));
        }
        if !(self.marker_width > 0.0 && self.marker_height > 0.0) {
            return Err(Self::invalid(
                "marker_width/marker_height",
                self.marker_width,
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> OverlayResult<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| OverlayError::IoError {
            message: e.to_string(),
        })?;

        let config: OverlayConfig =
            serde_json::from_str(&contents).map_err(|e| OverlayError::SerializationError {
                message: e.to_string(),
            })?;

        config.validate()?;
        tracing::info!(path = %path.as_ref().display(), "overlay configuration loaded");
        Ok(config)
    }

    /// Write the configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> OverlayResult<()> {
        let contents =
            serde_json::to_string_pretty(self).map_err(|e| OverlayError::SerializationError {
                message: e.to_string(),
            })?;

        fs::write(path.as_ref(), contents).map_err(|e| OverlayError::IoError {
            message: e.to_string(),
        })
    }

    fn invalid(parameter: &str, value: impl std::fmt::Display, reason: &str) -> OverlayError {
        OverlayError::ConfigurationError {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut config = OverlayConfig::default();
        config.fov_width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(OverlayError::ConfigurationError { .. })
        ));

        let mut config = OverlayConfig::default();
        config.filter_factor = 1.5;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.frequency_ms = 0;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.min_scale_factor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = OverlayConfig {
            frequency_ms: 100,
            scale_by_distance: true,
            ..OverlayConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let restored: OverlayConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_file_round_trip() {
        let mut path = std::env::temp_dir();
        path.push("ar_overlay_config_test.json");

        let config = OverlayConfig::default();
        config.save_to_file(&path).unwrap();
        let restored = OverlayConfig::load_from_file(&path).unwrap();
        assert_eq!(config, restored);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let result = OverlayConfig::load_from_file("/nonexistent/overlay.json");
        assert!(matches!(result, Err(OverlayError::IoError { .. })));
    }
}
