//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Events received from a connection.
///
/// `register` and `updateLocation` accept a missing or `null` `data` as an
/// empty payload, which leaves the connection positionless.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Register(RegisterPayload),
    UpdateLocation(LocationPayload),
    SendMessage(SendMessagePayload),
    GetNearbyUsers,
}

const CLIENT_EVENTS: &[&str] = &["register", "updateLocation", "sendMessage", "getNearbyUsers"];

/// Envelope read before the payload type is known
#[derive(Deserialize)]
struct RawClientEvent {
    event: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Payload that falls back to its default when `data` is absent or `null`
fn lenient_payload<T, E>(data: Option<Value>) -> Result<T, E>
where
    T: DeserializeOwned + Default,
    E: serde::de::Error,
{
    match data {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(E::custom),
    }
}

impl<'de> Deserialize<'de> for ClientEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let RawClientEvent { event, data } = RawClientEvent::deserialize(deserializer)?;
        match event.as_str() {
            "register" => lenient_payload(data).map(Self::Register),
            "updateLocation" => lenient_payload(data).map(Self::UpdateLocation),
            "sendMessage" => serde_json::from_value(data.unwrap_or(Value::Null))
                .map(Self::SendMessage)
                .map_err(serde::de::Error::custom),
            "getNearbyUsers" => Ok(Self::GetNearbyUsers),
            other => Err(serde::de::Error::unknown_variant(other, CLIENT_EVENTS)),
        }
    }
}

/// Coordinates stay as raw JSON so that malformed values make the user
/// positionless instead of rejecting the whole frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub text: String,
}

/// Events pushed to a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UserJoined(UserJoinedPayload),
    NearbyUsers(Vec<NeighborInfo>),
    UserLocationUpdated(UserLocationUpdatedPayload),
    NewMessage(MessagePayload),
    MessageSent(MessagePayload),
    UserLeft(UserLeftPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedPayload {
    pub connection_id: String,
    pub display_name: String,
    pub distance_meters: u32,
}

/// One entry of a `nearbyUsers` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborInfo {
    pub connection_id: String,
    pub display_name: String,
    pub distance_meters: u32,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocationUpdatedPayload {
    pub connection_id: String,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: u32,
}

/// Shared by `newMessage` and `messageSent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub sender_connection_id: String,
    pub sender_name: String,
    pub text: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Unix milliseconds (UTC)
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    pub connection_id: String,
    pub display_name: String,
}
