//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::execute() メソッド
//! - 削除前の近傍計算と `userLeft` の通知、Registry からの削除
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人の近傍にちょうど 2 件の `userLeft`
//! - エッジケース：位置不明のまま切断（通知なしで削除）
//! - 異常系：登録前に切断（no-op）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, PresenceRepository, ProximityConfig,
};

use super::error::DispatchError;

/// 切断のユースケース
pub struct DisconnectUserUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    config: ProximityConfig,
}

impl DisconnectUserUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        config: ProximityConfig,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            config,
        }
    }

    /// 切断を実行
    ///
    /// 近傍は削除前のレコードの位置で計算する。送信チャンネルは登録の有無に関わらず解除する。
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - `userLeft` の通知対象
    /// * `Err(DispatchError::NotRegistered)` - 一度も登録されなかった接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, DispatchError> {
        let Some(record) = self.repository.get(connection_id).await else {
            self.message_pusher.unregister_client(connection_id).await;
            return Err(DispatchError::NotRegistered(connection_id.to_string()));
        };

        // 1. 削除前に近傍を計算
        let targets: Vec<ConnectionId> = match &record.position {
            Some(position) => self
                .repository
                .find_nearby(position, Some(connection_id), self.config.radius_meters)
                .await
                .into_iter()
                .map(|neighbor| neighbor.connection_id)
                .collect(),
            None => Vec::new(),
        };

        // 2. 近傍へ userLeft を通知
        let left = Notification::UserLeft {
            connection_id: connection_id.clone(),
            display_name: record.display_name,
        };
        self.message_pusher.fan_out(&targets, &left).await;

        // 3. Registry から削除し、送信チャンネルを解除
        self.repository.remove(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;

        tracing::info!(
            "Connection '{}' left; notified {} neighbor(s)",
            connection_id,
            targets.len()
        );

        Ok(targets)
    }
}
