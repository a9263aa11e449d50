//! Repository trait 定義
//!
//! Presence Registry（接続中ユーザーのインメモリ集合）へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{NeighborResult, UserRecord},
    proximity,
    value_object::{ConnectionId, Coordinates, DisplayName, Timestamp},
};

/// Presence Repository trait
///
/// 接続 ID → UserRecord の対応を保持する唯一の場所。
/// ライブな近接判定は常にこの Registry を参照し、永続化ストアは参照しない。
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// レコードを挿入、または既存レコードを上書き（last_seen は常に更新）
    async fn upsert(
        &self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        position: Option<Coordinates>,
        seen_at: Timestamp,
    ) -> UserRecord;

    /// 位置を更新。未登録の接続なら何もせず `None` を返す
    async fn update_position(
        &self,
        connection_id: &ConnectionId,
        position: Option<Coordinates>,
        seen_at: Timestamp,
    ) -> Option<UserRecord>;

    /// レコードを取得
    async fn get(&self, connection_id: &ConnectionId) -> Option<UserRecord>;

    /// レコードを削除。存在しなければ何もしない
    async fn remove(&self, connection_id: &ConnectionId) -> Option<UserRecord>;

    /// 呼び出し時点のスナップショット
    async fn all(&self) -> Vec<UserRecord>;

    /// `origin` から半径内のユーザーを検索（読み取りのみ）
    async fn find_nearby(
        &self,
        origin: &Coordinates,
        exclude: Option<&ConnectionId>,
        radius_meters: f64,
    ) -> Vec<NeighborResult> {
        let snapshot = self.all().await;
        proximity::find_nearby(&snapshot, origin, exclude, radius_meters)
    }
}
