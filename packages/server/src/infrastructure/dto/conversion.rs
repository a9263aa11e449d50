//! Conversion logic between DTOs and domain models.

use serde_json::Value;

use crate::domain::{
    Coordinates, DisplayName, InboundEvent, MessageEvent, MessageText, NeighborResult,
    Notification, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};
use vicinity_shared::time::timestamp_to_rfc3339;

// ========================================
// DTO → Domain
// ========================================

/// Read one coordinate from a JSON number or a numeric string.
fn parse_coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Build a position from raw JSON, or `None` if either value is missing,
/// non-numeric or out of range.
pub fn parse_position(latitude: Option<&Value>, longitude: Option<&Value>) -> Option<Coordinates> {
    let latitude = parse_coordinate(latitude)?;
    let longitude = parse_coordinate(longitude)?;
    Coordinates::new(latitude, longitude).ok()
}

impl TryFrom<dto::ClientEvent> for InboundEvent {
    type Error = ValueObjectError;

    fn try_from(event: dto::ClientEvent) -> Result<Self, Self::Error> {
        Ok(match event {
            dto::ClientEvent::Register(payload) => InboundEvent::Register {
                display_name: DisplayName::from_input(payload.display_name),
                position: parse_position(payload.latitude.as_ref(), payload.longitude.as_ref()),
            },
            dto::ClientEvent::UpdateLocation(payload) => InboundEvent::UpdateLocation {
                position: parse_position(payload.latitude.as_ref(), payload.longitude.as_ref()),
            },
            dto::ClientEvent::SendMessage(payload) => InboundEvent::SendMessage {
                text: MessageText::new(payload.text)?,
            },
            dto::ClientEvent::GetNearbyUsers => InboundEvent::GetNearbyUsers,
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<NeighborResult> for dto::NeighborInfo {
    fn from(neighbor: NeighborResult) -> Self {
        Self {
            connection_id: neighbor.connection_id.into_string(),
            display_name: neighbor.display_name.into_string(),
            distance_meters: neighbor.distance_meters,
            latitude: neighbor.position.latitude(),
            longitude: neighbor.position.longitude(),
        }
    }
}

impl From<MessageEvent> for dto::MessagePayload {
    fn from(message: MessageEvent) -> Self {
        Self {
            sender_connection_id: message.sender_connection_id.into_string(),
            sender_name: message.sender_name.into_string(),
            text: message.text.into_string(),
            latitude: message.position.latitude(),
            longitude: message.position.longitude(),
            timestamp: message.timestamp.value(),
        }
    }
}

impl From<Notification> for dto::ServerEvent {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::UserJoined {
                connection_id,
                display_name,
                distance_meters,
            } => Self::UserJoined(dto::UserJoinedPayload {
                connection_id: connection_id.into_string(),
                display_name: display_name.into_string(),
                distance_meters,
            }),
            Notification::NearbyUsers(neighbors) => {
                Self::NearbyUsers(neighbors.into_iter().map(Into::into).collect())
            }
            Notification::UserLocationUpdated {
                connection_id,
                display_name,
                position,
                distance_meters,
            } => Self::UserLocationUpdated(dto::UserLocationUpdatedPayload {
                connection_id: connection_id.into_string(),
                display_name: display_name.into_string(),
                latitude: position.latitude(),
                longitude: position.longitude(),
                distance_meters,
            }),
            Notification::NewMessage(message) => Self::NewMessage(message.into()),
            Notification::MessageSent(message) => Self::MessageSent(message.into()),
            Notification::UserLeft {
                connection_id,
                display_name,
            } => Self::UserLeft(dto::UserLeftPayload {
                connection_id: connection_id.into_string(),
                display_name: display_name.into_string(),
            }),
        }
    }
}

impl From<NeighborResult> for http::NearbyUserDto {
    fn from(neighbor: NeighborResult) -> Self {
        Self {
            connection_id: neighbor.connection_id.into_string(),
            display_name: neighbor.display_name.into_string(),
            distance_meters: neighbor.distance_meters,
            latitude: neighbor.position.latitude(),
            longitude: neighbor.position.longitude(),
        }
    }
}

impl From<MessageEvent> for http::RecentMessageDto {
    fn from(message: MessageEvent) -> Self {
        let timestamp = message.timestamp.value();
        Self {
            sender_connection_id: message.sender_connection_id.into_string(),
            sender_name: message.sender_name.into_string(),
            text: message.text.into_string(),
            latitude: message.position.latitude(),
            longitude: message.position.longitude(),
            timestamp,
            sent_at: timestamp_to_rfc3339(timestamp),
        }
    }
}
