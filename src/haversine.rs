//! Great-circle distance and drive-time estimation.
//!
//! Straight-line distance ignores the road network, but every coordinate in
//! a collection zone comes from the same trusted dataset and the zones are
//! small, so the approximation holds up well for tour comparison.

/// Average collection-truck speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// Inputs are decimal degrees. Coordinates are not range-checked; out-of-range
/// values produce mathematically defined but meaningless results.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimated drive time in seconds for a distance at an assumed average speed.
pub fn drive_time_secs(km: f64, speed_kmh: f64) -> u64 {
    let hours = km / speed_kmh;
    (hours * 3600.0).round() as u64
}
