//! Geodetic-to-polar math

pub mod geodesy;

pub use geodesy::{bearing, distance_3d, elevation_angle, haversine_distance};
pub use geodesy::{Haversine, HorizontalDistance};
