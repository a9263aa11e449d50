//! Proximity query: which registered users are within the radius of a point.

use super::{
    entity::{NeighborResult, UserRecord},
    geo::distance_between,
    value_object::{ConnectionId, Coordinates},
};

/// Default radius that defines "nearby", in meters.
pub const PROXIMITY_RADIUS_METERS: f64 = 30.0;

/// Default look-back window for the recent-messages query, in seconds.
pub const RECENT_MESSAGE_WINDOW_SECS: i64 = 60 * 60;

/// Tunables for proximity fan-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    pub radius_meters: f64,
    pub message_window_secs: i64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius_meters: PROXIMITY_RADIUS_METERS,
            message_window_secs: RECENT_MESSAGE_WINDOW_SECS,
        }
    }
}

/// Scan `users` and return every entry within `radius_meters` of `origin`.
///
/// The excluded connection and positionless records are skipped. Inclusion
/// compares the unrounded distance; only the reported distance is rounded.
/// Result order follows the input order.
pub fn find_nearby<'a, I>(
    users: I,
    origin: &Coordinates,
    exclude: Option<&ConnectionId>,
    radius_meters: f64,
) -> Vec<NeighborResult>
where
    I: IntoIterator<Item = &'a UserRecord>,
{
    users
        .into_iter()
        .filter(|user| Some(&user.connection_id) != exclude)
        .filter_map(|user| {
            let position = user.position?;
            let distance = distance_between(origin, &position);
            (distance <= radius_meters).then(|| NeighborResult {
                connection_id: user.connection_id.clone(),
                display_name: user.display_name.clone(),
                distance_meters: distance.round() as u32,
                position,
            })
        })
        .collect()
}
