//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{EventDispatcher, GetRecentMessagesUseCase, QueryNearbyUseCase};

/// Shared application state
pub struct AppState {
    /// EventDispatcher（接続ごとの状態遷移）
    pub dispatcher: Arc<EventDispatcher>,
    /// QueryNearbyUseCase（HTTP からの近傍検索）
    pub query_nearby_usecase: Arc<QueryNearbyUseCase>,
    /// GetRecentMessagesUseCase（HTTP からの履歴検索）
    pub get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
}
