//! UseCase layer: one use case per connection transition, composed by the
//! [`EventDispatcher`], plus the read-only queries served over HTTP.

mod disconnect_user;
mod dispatcher;
mod error;
mod get_recent_messages;
mod query_nearby;
mod register_user;
mod send_message;
mod update_location;

#[cfg(test)]
pub(crate) mod test_support;

pub use disconnect_user::DisconnectUserUseCase;
pub use dispatcher::EventDispatcher;
pub use error::DispatchError;
pub use get_recent_messages::GetRecentMessagesUseCase;
pub use query_nearby::QueryNearbyUseCase;
pub use register_user::RegisterUserUseCase;
pub use send_message::SendMessageUseCase;
pub use update_location::UpdateLocationUseCase;

use crate::domain::{ConnectionId, MessagePusher, Notification, StoreError};

/// 1 件の送信。失敗はログに残して握りつぶす
async fn push_or_warn(
    message_pusher: &dyn MessagePusher,
    target: &ConnectionId,
    notification: &Notification,
) {
    if let Err(e) = message_pusher.push_to(target, notification).await {
        tracing::warn!(
            "Failed to deliver '{}' to '{}': {}",
            notification.event_name(),
            target,
            e
        );
    }
}

/// 永続化の結果。失敗はログに残して握りつぶす
fn log_store_result(operation: &str, connection_id: &ConnectionId, result: Result<(), StoreError>) {
    if let Err(e) = result {
        tracing::warn!(
            "Failed to persist {} for '{}': {}",
            operation,
            connection_id,
            e
        );
    }
}
