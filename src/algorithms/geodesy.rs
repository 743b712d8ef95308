//! Geodetic math for short-baseline overlay positioning
//!
//! All functions here use a flat-earth/spherical approximation that is only
//! valid for short baselines (tens of meters to a few kilometers). No
//! great-circle correction is applied to bearings.

use crate::core::constants::EARTH_RADIUS_MEAN;
use crate::core::types::GeoLocation;
use std::f64::consts::{FRAC_PI_2, PI};

/// Provider of horizontal (great-circle) distance between two geolocations.
///
/// The overlay core does not own the distance model; platforms that already
/// have an ellipsoidal distance from their location stack can supply it
/// through this seam. [`Haversine`] is the stock implementation.
pub trait HorizontalDistance {
    /// Horizontal distance in meters between two positions
    fn horizontal_distance(&self, from: &GeoLocation, to: &GeoLocation) -> f64;
}

/// Haversine distance on the mean-Earth sphere
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl HorizontalDistance for Haversine {
    fn horizontal_distance(&self, from: &GeoLocation, to: &GeoLocation) -> f64 {
        haversine_distance(from, to)
    }
}

/// Compass bearing from `from` to `to` in radians, [0, 2π).
///
/// Quadrant rules:
/// - Δlon > 0: `π/2 − atan(Δlat/Δlon)`
/// - Δlon < 0: the same angle plus π
/// - Δlon == 0, Δlat < 0: π (due south)
/// - Δlon == 0, Δlat ≥ 0: 0, including the degenerate same-point case
pub fn bearing(from: &GeoLocation, to: &GeoLocation) -> f64 {
    let lon_diff = to.longitude - from.longitude;
    let lat_diff = to.latitude - from.latitude;

    let candidate = FRAC_PI_2 - (lat_diff / lon_diff).atan();

    if lon_diff > 0.0 {
        candidate
    } else if lon_diff < 0.0 {
        candidate + PI
    } else if lat_diff < 0.0 {
        PI
    } else {
        0.0
    }
}

/// Signed elevation angle in radians from the origin altitude toward the
/// target altitude, given the straight-line distance between them.
///
/// Derived as `asin(|Δalt| / distance)` and negated when the origin sits
/// above the target (look-down). Returns 0 for coincident points instead of
/// propagating NaN.
pub fn elevation_angle(origin_altitude: f64, target_altitude: f64, distance: f64) -> f64 {
    if distance == 0.0 {
        return 0.0;
    }

    let altitude_diff = origin_altitude - target_altitude;
    let angle = (altitude_diff.abs() / distance).asin();

    if origin_altitude > target_altitude {
        -angle
    } else {
        angle
    }
}

/// Straight-line distance combining a horizontal distance with the altitude
/// difference between the two positions.
pub fn distance_3d(from: &GeoLocation, to: &GeoLocation, horizontal: f64) -> f64 {
    let altitude_diff = from.altitude - to.altitude;
    (horizontal * horizontal + altitude_diff * altitude_diff).sqrt()
}

/// Great-circle distance in meters on the mean-Earth sphere
pub fn haversine_distance(from: &GeoLocation, to: &GeoLocation) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MEAN * c
}
