//! Tracked points of interest and their screen-space projection
//!
//! A [`TrackedPoint`] wraps one target. Geolocated points are recalibrated
//! against every device location fix; manually-placed points carry an
//! authoritative polar coordinate and are immune to recalibration. Projection
//! and containment work entirely in the local spherical frame, so the same
//! code serves both kinds.

use crate::algorithms::geodesy::{self, HorizontalDistance};
use crate::core::constants::MARKER_PERSPECTIVE;
use crate::core::types::{
    FieldOfView, GeoLocation, PolarCoordinate, ReferenceOrientation, ScreenPoint, Viewport,
};
use nalgebra::{Matrix4, Rotation3, Vector3};
use std::f64::consts::PI;

/// One target overlaid on the camera feed
#[derive(Debug, Clone)]
pub struct TrackedPoint {
    polar: PolarCoordinate,
    geo_location: Option<GeoLocation>,
    label: Option<String>,
}

impl TrackedPoint {
    /// Place a point directly at a polar coordinate. Such points are never
    /// recalibrated; the polar coordinate is authoritative.
    pub fn from_polar(distance: f64, inclination: f64, azimuth: f64) -> Self {
        Self {
            polar: PolarCoordinate::new(distance, inclination, azimuth),
            geo_location: None,
            label: None,
        }
    }

    /// Track an absolute geolocation. The polar coordinate starts at zero and
    /// becomes meaningful after the first recalibration.
    pub fn from_location(location: GeoLocation) -> Self {
        Self {
            polar: PolarCoordinate::new(0.0, 0.0, 0.0),
            geo_location: Some(location),
            label: None,
        }
    }

    /// Attach a display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn polar(&self) -> &PolarCoordinate {
        &self.polar
    }

    pub fn geo_location(&self) -> Option<&GeoLocation> {
        self.geo_location.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Recompute the polar coordinate relative to a new device location.
    ///
    /// No-op for manually-placed points. The stored coordinate is replaced
    /// atomically: distance, inclination and azimuth always describe the same
    /// device position.
    pub fn recalibrate(&mut self, device: &GeoLocation, model: &dyn HorizontalDistance) {
        let Some(target) = self.geo_location else {
            return;
        };

        let horizontal = model.horizontal_distance(device, &target);
        let distance = geodesy::distance_3d(device, &target, horizontal);
        let inclination = geodesy::elevation_angle(device.altitude, target.altitude, distance);
        let azimuth = geodesy::bearing(device, &target);

        self.polar = PolarCoordinate::new(distance, inclination, azimuth);
    }

    /// Field-of-view containment test against the device orientation.
    ///
    /// Azimuth containment is circular: when the window straddles the 0/2π
    /// seam, the point is inside if it falls on either side of the seam.
    /// Inclination containment does not wrap. Both bounds are strict; a point
    /// exactly on an edge counts as outside.
    pub fn is_visible(&self, reference: &ReferenceOrientation, fov: &FieldOfView) -> bool {
        // A geolocated point coincident with the device has no direction
        if self.geo_location.is_some() && self.polar.distance == 0.0 {
            return false;
        }

        let mut left_azimuth = reference.azimuth - fov.width / 2.0;
        if left_azimuth < 0.0 {
            left_azimuth += 2.0 * PI;
        }

        let mut right_azimuth = reference.azimuth + fov.width / 2.0;
        if right_azimuth > 2.0 * PI {
            right_azimuth -= 2.0 * PI;
        }

        let azimuth_in_range = if left_azimuth > right_azimuth {
            // Window straddles the seam
            self.polar.azimuth < right_azimuth || self.polar.azimuth > left_azimuth
        } else {
            self.polar.azimuth > left_azimuth && self.polar.azimuth < right_azimuth
        };

        let bottom_inclination = reference.inclination - fov.height / 2.0;
        let top_inclination = reference.inclination + fov.height / 2.0;
        let inclination_in_range =
            self.polar.inclination > bottom_inclination && self.polar.inclination < top_inclination;

        azimuth_in_range && inclination_in_range
    }

    /// Project the point into overlay coordinates.
    ///
    /// The horizontal axis maps the azimuth window onto the viewport width,
    /// with a dedicated branch for points that sit just past the 0/2π seam
    /// from the left edge. The vertical axis is flipped: higher inclination
    /// lands closer to the top of the overlay.
    pub fn project(
        &self,
        reference: &ReferenceOrientation,
        fov: &FieldOfView,
        viewport: &Viewport,
    ) -> ScreenPoint {
        let point_azimuth = self.polar.azimuth;
        let mut left_azimuth = reference.azimuth - fov.width / 2.0;
        if left_azimuth < 0.0 {
            left_azimuth += 2.0 * PI;
        }

        let x = if point_azimuth < left_azimuth {
            (((2.0 * PI - left_azimuth) + point_azimuth) / fov.width) * viewport.width
        } else {
            ((point_azimuth - left_azimuth) / fov.width) * viewport.width
        };

        let top_inclination = reference.inclination - fov.height / 2.0;
        let y = viewport.height
            - ((self.polar.inclination - top_inclination) / fov.height) * viewport.height;

        ScreenPoint::new(x, y)
    }

    /// Rotation about the screen vertical axis for a marker facing the viewer.
    ///
    /// The azimuth difference is unwrapped so it never exceeds ±π. The two
    /// wrap cases adjust different sides of the difference (the target's
    /// azimuth for the negative wrap, the reference's for the positive one);
    /// both corrections happen on local copies.
    pub fn rotation_angle(
        &self,
        reference: &ReferenceOrientation,
        fov: &FieldOfView,
        max_rotation_angle: f64,
    ) -> f64 {
        let mut point_azimuth = self.polar.azimuth;
        let mut center_azimuth = reference.azimuth;

        if point_azimuth - center_azimuth > PI {
            center_azimuth += 2.0 * PI;
        }
        if point_azimuth - center_azimuth < -PI {
            point_azimuth += 2.0 * PI;
        }

        let angle_difference = point_azimuth - center_azimuth;
        max_rotation_angle * angle_difference / (fov.height / 2.0)
    }
}

/// Distance-based marker scale relative to the farthest point seen so far.
///
/// Returns 1.0 when scaling is disabled or no distance has been observed;
/// otherwise the ratio clamped to `[min_scale_factor, 1.0]`.
pub fn scale_factor(
    distance: f64,
    max_observed_distance: f64,
    scale_by_distance: bool,
    min_scale_factor: f64,
) -> f64 {
    if !scale_by_distance || max_observed_distance <= 0.0 {
        return 1.0;
    }
    (distance / max_observed_distance).clamp(min_scale_factor, 1.0)
}

/// Build the homogeneous marker transform handed to the renderer.
///
/// Scale is applied first, then the perspective term, then the rotation about
/// the screen vertical axis, matching the order markers are composed in.
pub fn marker_transform(rotation: f64, scale: f64, allow_rotate: bool) -> Matrix4<f64> {
    let mut transform = Matrix4::new_scaling(scale);

    if allow_rotate {
        transform[(3, 2)] = MARKER_PERSPECTIVE;
        let rotation_matrix =
            Rotation3::from_axis_angle(&Vector3::y_axis(), rotation).to_homogeneous();
        transform *= rotation_matrix;
    }

    transform
}
