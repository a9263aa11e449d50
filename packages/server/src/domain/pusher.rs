//! MessagePusher trait 定義
//!
//! トランスポート層の「特定の接続へ送る」プリミティブの抽象化。
//! 全体ブロードキャストは存在せず、配送は常に計算済みの近傍集合への個別送信です。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, notification::Notification, value_object::ConnectionId};

/// 接続ごとの送信チャンネル（シリアライズ済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 1 つの接続へ通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 同じ通知を複数の接続へ個別に送信
    ///
    /// 1 件の失敗で残りの配送を止めない。配送できた件数を返す。
    async fn fan_out(&self, targets: &[ConnectionId], notification: &Notification) -> usize {
        let mut delivered = 0;
        for target in targets {
            match self.push_to(target, notification).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Failed to deliver '{}' to '{}': {}",
                    notification.event_name(),
                    target,
                    e
                ),
            }
        }
        delivered
    }
}
