//! Point-to-point distance measurement
//!
//! Two metrics are provided:
//! - `Planar`: equirectangular approximation scaled by the length of one
//!   degree, cheap and accurate for short distances. Falls back to haversine
//!   once either axis differs by more than [`PLANAR_LIMIT_DEG`].
//! - `Haversine`: great-circle distance on a spherical earth.

use super::Coordinate;

/// Mean earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of arc (meridian quadrant of 10 000.8 km over 90°)
pub const METERS_PER_DEGREE: f64 = 1000.0 * 10_000.8 / 90.0;

/// Beyond this many degrees on either axis the planar metric uses haversine
pub const PLANAR_LIMIT_DEG: f64 = 0.2;

/// Measures the distance between two coordinates in meters
///
/// Implementations must be pure: the same inputs always give the same
/// non-negative result, and calls may happen from any thread.
pub trait DistanceOracle: Send + Sync {
    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64;
}

/// Built-in distance metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DistanceMetric {
    /// Flat-earth approximation, haversine for far-apart points
    #[default]
    Planar,
    /// Great-circle distance
    Haversine,
}

impl DistanceOracle for DistanceMetric {
    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        match self {
            DistanceMetric::Planar => planar_distance(a, b),
            DistanceMetric::Haversine => haversine_distance(a, b),
        }
    }
}

/// Great-circle distance in meters
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Equirectangular distance in meters, scaled at the latitude of `a`
pub fn planar_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let dlat = a.latitude - b.latitude;
    let dlon = a.longitude - b.longitude;

    if dlat.abs() > PLANAR_LIMIT_DEG || dlon.abs() > PLANAR_LIMIT_DEG {
        return haversine_distance(a, b);
    }

    let x = dlat;
    let y = dlon * a.latitude.to_radians().cos();
    (x * x + y * y).sqrt() * METERS_PER_DEGREE
}
