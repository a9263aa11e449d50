//! UseCase: 付近の最近のメッセージ（HTTP 用の読み取り）

use std::sync::Arc;

use vicinity_shared::time::Clock;

use crate::domain::{
    Coordinates, MessageEvent, PresenceStore, ProximityConfig, StoreError, Timestamp,
};

/// 最近のメッセージ取得のユースケース
///
/// 永続化ストアのみを参照し、ライブな Registry は参照しない。
pub struct GetRecentMessagesUseCase {
    store: Arc<dyn PresenceStore>,
    clock: Arc<dyn Clock>,
    config: ProximityConfig,
}

impl GetRecentMessagesUseCase {
    pub fn new(
        store: Arc<dyn PresenceStore>,
        clock: Arc<dyn Clock>,
        config: ProximityConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// `origin` から半径内で、直近のウィンドウ内に送られたメッセージ（新しい順）
    pub async fn execute(&self, origin: &Coordinates) -> Result<Vec<MessageEvent>, StoreError> {
        let since =
            Timestamp::new(self.clock.now_millis()).minus_secs(self.config.message_window_secs);
        self.store
            .query_recent_messages_near(origin, self.config.radius_meters, since)
            .await
    }
}
