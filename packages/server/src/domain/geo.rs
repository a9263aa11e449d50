//! Great-circle distance between two points on the Earth.

use super::value_object::Coordinates;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two latitude/longitude pairs (degrees).
///
/// Symmetric, non-negative and zero for identical points. Callers must pass
/// finite coordinates.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    // rounding can push `a` just above 1 for antipodal points
    let a = ((delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// [`distance_meters`] for two validated positions.
pub fn distance_between(a: &Coordinates, b: &Coordinates) -> f64 {
    distance_meters(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}
