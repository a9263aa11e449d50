//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// `?latitude=..&longitude=..`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// A user returned by `GET /api/users/nearby`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyUserDto {
    pub connection_id: String,
    pub display_name: String,
    pub distance_meters: u32,
    pub latitude: f64,
    pub longitude: f64,
}

/// A message returned by `GET /api/messages/recent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMessageDto {
    pub sender_connection_id: String,
    pub sender_name: String,
    pub text: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
    /// RFC 3339 (UTC); absent if the timestamp cannot be represented
    pub sent_at: Option<String>,
}
