//! PresenceStore trait 定義
//!
//! ユーザーとメッセージの任意の永続ログ。履歴の問い合わせにのみ使われ、
//! ライブな近接判定には使われない。書き込みはベストエフォートで、
//! 呼び出し側はエラーをログに残して握りつぶす。

use async_trait::async_trait;

use super::{
    entity::{MessageEvent, UserRecord},
    error::StoreError,
    value_object::{ConnectionId, Coordinates, Timestamp},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// ユーザー行を挿入または置換（接続 ID がキー）
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError>;

    /// ユーザー行の位置と最終確認時刻を更新
    async fn update_user_position(
        &self,
        connection_id: &ConnectionId,
        position: Option<Coordinates>,
        seen_at: Timestamp,
    ) -> Result<(), StoreError>;

    /// メッセージをログへ追記
    async fn append_message(&self, message: &MessageEvent) -> Result<(), StoreError>;

    /// `since` 以降に `origin` から半径内で送られたメッセージ（新しい順）
    async fn query_recent_messages_near(
        &self,
        origin: &Coordinates,
        radius_meters: f64,
        since: Timestamp,
    ) -> Result<Vec<MessageEvent>, StoreError>;
}
