//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者の現在位置を中心とした近傍への `newMessage` のファンアウト
//! - 送信者への `messageSent` の確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：近くのユーザーへの配送とメッセージログへの追記
//! - エッジケース：近傍がいない場合も送信者には確認が届く
//! - 異常系：未登録・位置不明の送信者（no-op）、永続化の失敗

use std::sync::Arc;

use vicinity_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessageEvent, MessagePusher, MessageText, Notification, PresenceRepository,
    PresenceStore, ProximityConfig, Timestamp,
};

use super::{error::DispatchError, log_store_result, push_or_warn};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    store: Arc<dyn PresenceStore>,
    clock: Arc<dyn Clock>,
    config: ProximityConfig,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - `newMessage` の配送対象
    /// * `Err(DispatchError)` - 未登録または位置不明の送信者（何も送らない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        text: MessageText,
    ) -> Result<Vec<ConnectionId>, DispatchError> {
        // 1. 送信者の現在位置を取得
        let sender = self
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| DispatchError::NotRegistered(connection_id.to_string()))?;
        let position = sender
            .position
            .ok_or_else(|| DispatchError::NoPosition(connection_id.to_string()))?;

        // 2. 配送対象を取得（送信者を除く近傍）
        let targets: Vec<ConnectionId> = self
            .repository
            .find_nearby(&position, Some(connection_id), self.config.radius_meters)
            .await
            .into_iter()
            .map(|neighbor| neighbor.connection_id)
            .collect();

        let message = MessageEvent {
            sender_connection_id: connection_id.clone(),
            sender_name: sender.display_name,
            text,
            position,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };

        // 3. 近傍へファンアウトし、送信者に確認を返す
        let delivered = self
            .message_pusher
            .fan_out(&targets, &Notification::NewMessage(message.clone()))
            .await;
        push_or_warn(
            self.message_pusher.as_ref(),
            connection_id,
            &Notification::MessageSent(message.clone()),
        )
        .await;

        // 4. メッセージログへ追記（ベストエフォート）
        log_store_result(
            "message",
            connection_id,
            self.store.append_message(&message).await,
        );

        tracing::info!(
            "Message from '{}' delivered to {}/{} nearby connection(s)",
            connection_id,
            delivered,
            targets.len()
        );

        Ok(targets)
    }
}
