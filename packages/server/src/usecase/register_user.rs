//! UseCase: ユーザー登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() メソッド
//! - 登録時の近傍計算、`userJoined` の通知、`nearbyUsers` の返信
//!
//! ### どのような状況を想定しているか
//! - 正常系：近くのユーザーへの通知と、登録者へのスナップショット
//! - エッジケース：位置不明での登録、再登録（上書き）
//! - 異常系：永続化の失敗、一部の近傍への配送失敗

use std::sync::Arc;

use vicinity_shared::time::Clock;

use crate::domain::{
    ConnectionId, Coordinates, DisplayName, MessagePusher, NeighborResult, Notification,
    PresenceRepository, PresenceStore, ProximityConfig, Timestamp,
};

use super::{log_store_result, push_or_warn};

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    store: Arc<dyn PresenceStore>,
    clock: Arc<dyn Clock>,
    config: ProximityConfig,
}

impl RegisterUserUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        store: Arc<dyn PresenceStore>,
        clock: Arc<dyn Clock>,
        config: ProximityConfig,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            store,
            clock,
            config,
        }
    }

    /// 登録を実行
    ///
    /// 近くの各ユーザーに `userJoined` を送った後、登録者に `nearbyUsers` を返す。
    /// 位置が不明な場合、近傍は空として扱う。
    ///
    /// # Returns
    ///
    /// 登録者から見た近傍リスト
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        position: Option<Coordinates>,
    ) -> Vec<NeighborResult> {
        let seen_at = Timestamp::new(self.clock.now_millis());

        // 1. Registry を挿入または上書き
        let record = self
            .repository
            .upsert(connection_id.clone(), display_name, position, seen_at)
            .await;

        // 2. 近傍を計算
        let neighbors = match &record.position {
            Some(position) => {
                self.repository
                    .find_nearby(position, Some(&connection_id), self.config.radius_meters)
                    .await
            }
            None => {
                tracing::debug!("Connection '{}' registered without a position", connection_id);
                Vec::new()
            }
        };

        // 3. 近傍ごとに距離入りの userJoined を送信
        for neighbor in &neighbors {
            let joined = Notification::UserJoined {
                connection_id: connection_id.clone(),
                display_name: record.display_name.clone(),
                distance_meters: neighbor.distance_meters,
            };
            push_or_warn(
                self.message_pusher.as_ref(),
                &neighbor.connection_id,
                &joined,
            )
            .await;
        }

        // 4. 登録者にスナップショットを返信
        push_or_warn(
            self.message_pusher.as_ref(),
            &connection_id,
            &Notification::NearbyUsers(neighbors.clone()),
        )
        .await;

        // 5. 永続化（ベストエフォート）
        log_store_result(
            "user",
            &connection_id,
            self.store.upsert_user(&record).await,
        );

        tracing::info!(
            "Connection '{}' registered as '{}' with {} neighbor(s)",
            connection_id,
            record.display_name.as_str(),
            neighbors.len()
        );

        neighbors
    }
}
