//! InMemory Presence Repository 実装
//!
//! ドメイン層が定義する PresenceRepository trait の具体的な実装。
//! HashMap をミューテックスで保護して Registry として使用します。
//!
//! ロックは各操作の間だけ保持され、ネットワーク I/O をまたいで保持されることはない。
//! 同じ接続への同時書き込みは後勝ち。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Coordinates, DisplayName, NeighborResult, PresenceRepository, Timestamp,
    UserRecord, find_nearby,
};

/// インメモリ Presence Repository 実装
#[derive(Default)]
pub struct InMemoryPresenceRepository {
    /// 接続 ID → UserRecord
    users: Mutex<HashMap<ConnectionId, UserRecord>>,
}

impl InMemoryPresenceRepository {
    /// 空の Registry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn upsert(
        &self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        position: Option<Coordinates>,
        seen_at: Timestamp,
    ) -> UserRecord {
        let record = UserRecord::new(connection_id.clone(), display_name, position, seen_at);
        let mut users = self.users.lock().await;
        users.insert(connection_id, record.clone());
        record
    }

    async fn update_position(
        &self,
        connection_id: &ConnectionId,
        position: Option<Coordinates>,
        seen_at: Timestamp,
    ) -> Option<UserRecord> {
        let mut users = self.users.lock().await;
        let record = users.get_mut(connection_id)?;
        record.position = position;
        record.last_seen = seen_at;
        Some(record.clone())
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<UserRecord> {
        let users = self.users.lock().await;
        users.get(connection_id).cloned()
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<UserRecord> {
        let mut users = self.users.lock().await;
        users.remove(connection_id)
    }

    async fn all(&self) -> Vec<UserRecord> {
        let users = self.users.lock().await;
        users.values().cloned().collect()
    }

    async fn find_nearby(
        &self,
        origin: &Coordinates,
        exclude: Option<&ConnectionId>,
        radius_meters: f64,
    ) -> Vec<NeighborResult> {
        // ロック内で走査する（I/O は行わない）
        let users = self.users.lock().await;
        find_nearby(users.values(), origin, exclude, radius_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn coords(lat: f64, lon: f64) -> Option<Coordinates> {
        Some(Coordinates::new(lat, lon).unwrap())
    }

    #[tokio::test]
    async fn test_upsert_inserts_new_record() {
        // テスト項目: 新しい接続のレコードが挿入される
        // given (前提条件):
        let repository = InMemoryPresenceRepository::new();

        // when (操作):
        let record = repository
            .upsert(
                conn("alice"),
                DisplayName::new("Alice"),
                coords(10.0, 20.0),
                Timestamp::new(1000),
            )
            .await;

        // then (期待する結果):
        assert_eq!(repository.all().await.len(), 1);
        assert_eq!(repository.get(&conn("alice")).await, Some(record));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_record() {
        // テスト項目: 同じ接続の再登録は上書きになる（後勝ち）
        // given (前提条件):
        let repository = InMemoryPresenceRepository::new();
        repository
            .upsert(
                conn("alice"),
                DisplayName::new("Alice"),
                coords(10.0, 20.0),
                Timestamp::new(1000),
            )
            .await;

        // when (操作):
        repository
            .upsert(
                conn("alice"),
                DisplayName::new("Alice2"),
                coords(11.0, 21.0),
                Timestamp::new(2000),
            )
            .await;

        // then (期待する結果):
        let record = repository.get(&conn("alice")).await.unwrap();
        assert_eq!(repository.all().await.len(), 1);
        assert_eq!(record.display_name.as_str(), "Alice2");
        assert_eq!(record.position, coords(11.0, 21.0));
        assert_eq!(record.last_seen, Timestamp::new(2000));
    }

    #[tokio::test]
    async fn test_update_position_mutates_in_place() {
        // テスト項目: 位置更新で座標と last_seen が更新され、表示名は保持される
        // given (前提条件):
        let repository = InMemoryPresenceRepository::new();
        repository
            .upsert(
                conn("alice"),
                DisplayName::new("Alice"),
                coords(10.0, 20.0),
                Timestamp::new(1000),
            )
            .await;

        // when (操作):
        let updated = repository
            .update_position(&conn("alice"), coords(10.5, 20.5), Timestamp::new(3000))
            .await;

        // then (期待する結果):
        let updated = updated.unwrap();
        assert_eq!(updated.display_name.as_str(), "Alice");
        assert_eq!(updated.position, coords(10.5, 20.5));
        assert_eq!(updated.last_seen, Timestamp::new(3000));
        assert_eq!(repository.get(&conn("alice")).await, Some(updated));
    }

    #[tokio::test]
    async fn test_update_position_unknown_connection_is_noop() {
        // テスト項目: 未登録の接続の位置更新は何もしない
        // given (前提条件):
        let repository = InMemoryPresenceRepository::new();

        // when (操作):
        let result = repository
            .update_position(&conn("ghost"), coords(1.0, 1.0), Timestamp::new(1000))
            .await;

        // then (期待する結果):
        assert!(result.is_none());
        assert_eq!(repository.all().await.len(), 0);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        // テスト項目: 削除は存在しないレコードに対しても安全
        // given (前提条件):
        let repository = InMemoryPresenceRepository::new();
        repository
            .upsert(
                conn("alice"),
                DisplayName::new("Alice"),
                None,
                Timestamp::new(1000),
            )
            .await;

        // when (操作):
        let first = repository.remove(&conn("alice")).await;
        let second = repository.remove(&conn("alice")).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(repository.all().await.len(), 0);
    }

    #[tokio::test]
    async fn test_all_returns_snapshot() {
        // テスト項目: all() は呼び出し時点のスナップショットで、後の変更の影響を受けない
        // given (前提条件):
        let repository = InMemoryPresenceRepository::new();
        for id in ["alice", "bob"] {
            repository
                .upsert(conn(id), DisplayName::new(id), None, Timestamp::new(1000))
                .await;
        }

        // when (操作):
        let snapshot = repository.all().await;
        repository.remove(&conn("alice")).await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 2);
        assert_eq!(repository.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_find_nearby_matches_snapshot_query() {
        // テスト項目: Registry 上の近接検索は除外・半径・位置不明を正しく扱う
        // given (前提条件):
        let repository = InMemoryPresenceRepository::new();
        repository
            .upsert(conn("a"), DisplayName::new("A"), coords(10.0, 20.0), Timestamp::new(1))
            .await;
        repository
            .upsert(conn("b"), DisplayName::new("B"), coords(10.0, 20.0001), Timestamp::new(1))
            .await;
        repository
            .upsert(conn("c"), DisplayName::new("C"), coords(10.0, 21.0), Timestamp::new(1))
            .await;
        repository
            .upsert(conn("d"), DisplayName::new("D"), None, Timestamp::new(1))
            .await;

        // when (操作):
        let origin = Coordinates::new(10.0, 20.0).unwrap();
        let result = repository.find_nearby(&origin, Some(&conn("a")), 30.0).await;

        // then (期待する結果):
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].connection_id, conn("b"));
        assert_eq!(result[0].distance_meters, 11);
    }
}
