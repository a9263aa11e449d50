//! Domain layer: value objects, entities, the proximity engine and the
//! collaborator traits implemented by the infrastructure layer.

pub mod entity;
pub mod error;
pub mod event;
pub mod geo;
pub mod notification;
pub mod proximity;
pub mod pusher;
pub mod repository;
pub mod store;
pub mod value_object;

pub use entity::{MessageEvent, NeighborResult, UserRecord};
pub use error::{MessagePushError, StoreError, ValueObjectError};
pub use event::InboundEvent;
pub use geo::{EARTH_RADIUS_METERS, distance_between, distance_meters};
pub use notification::Notification;
pub use proximity::{
    PROXIMITY_RADIUS_METERS, ProximityConfig, RECENT_MESSAGE_WINDOW_SECS, find_nearby,
};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::PresenceRepository;
pub use store::PresenceStore;
pub use value_object::{ConnectionId, Coordinates, DisplayName, MessageText, Timestamp};
