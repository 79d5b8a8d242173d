//! Geographic conversion helpers for laying hexes over a lat/lon box
//!
//! The grid is small enough (a fraction of a degree) that a local equirect
//! approximation is fine for layout; true great-circle distance is only used
//! for reporting.

use geo::{HaversineDistance, Point};

use crate::core::types::GeoPoint;

/// Meters per degree of latitude, constant over the globe to within ~0.5%.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Convert a north/south extent in meters to degrees of latitude.
pub fn meters_to_degrees_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE_LAT
}

/// Convert an east/west extent in meters to degrees of longitude at the given
/// latitude. Meridians converge toward the poles, hence the cosine correction.
pub fn meters_to_degrees_lon(meters: f64, lat: f64) -> f64 {
    meters / (METERS_PER_DEGREE_LAT * lat.to_radians().cos())
}

/// Local east/north offset of `point` from `origin`, in meters.
pub fn lat_lon_to_meters(origin: &GeoPoint, point: &GeoPoint) -> (f64, f64) {
    let east =
        (point.lon - origin.lon) * METERS_PER_DEGREE_LAT * origin.lat.to_radians().cos();
    let north = (point.lat - origin.lat) * METERS_PER_DEGREE_LAT;
    (east, north)
}

/// Point at a local east/north offset (meters) from `origin`. Height carries
/// over from the origin.
pub fn meters_to_lat_lon(origin: &GeoPoint, east: f64, north: f64) -> GeoPoint {
    GeoPoint::new(
        origin.lon + meters_to_degrees_lon(east, origin.lat),
        origin.lat + meters_to_degrees_lat(north),
        origin.height,
    )
}

/// Great-circle distance between two points in meters.
pub fn great_circle_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let pa = Point::new(a.lon, a.lat);
    let pb = Point::new(b.lon, b.lat);
    pa.haversine_distance(&pb)
}
