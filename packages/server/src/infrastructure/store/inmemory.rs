//! InMemory PresenceStore 実装
//!
//! ユーザー行は接続 ID をキーに挿入または置換、メッセージは挿入順の追記ログ。
//! ライブな Registry とは独立しており、切断後もユーザー行は残る。
//!
//! 保持期間を過ぎたメッセージは追記時に、長く更新のないユーザー行は
//! 挿入時に取り除く。

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Coordinates, MessageEvent, PresenceStore, RECENT_MESSAGE_WINDOW_SECS,
    StoreError, Timestamp, UserRecord, distance_between,
};

/// ユーザー行の保持期間（秒）
pub const USER_RETENTION_SECS: i64 = 24 * 60 * 60;

/// インメモリ PresenceStore 実装
pub struct InMemoryPresenceStore {
    users: Mutex<HashMap<ConnectionId, UserRecord>>,
    messages: Mutex<VecDeque<MessageEvent>>,
    /// メッセージの保持期間（秒）
    message_retention_secs: i64,
}

impl Default for InMemoryPresenceStore {
    fn default() -> Self {
        Self::with_retention(RECENT_MESSAGE_WINDOW_SECS)
    }
}

impl InMemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// メッセージを `message_retention_secs` 秒だけ保持するストア
    pub fn with_retention(message_retention_secs: i64) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            messages: Mutex::new(VecDeque::new()),
            message_retention_secs,
        }
    }
}

#[cfg(test)]
impl InMemoryPresenceStore {
    /// 保存済みのユーザー行
    pub async fn user(&self, connection_id: &ConnectionId) -> Option<UserRecord> {
        self.users.lock().await.get(connection_id).cloned()
    }

    /// 保存済みのユーザー行数
    pub async fn user_count(&self) -> usize {
        self.users.lock().await.len()
    }

    /// 保存済みのメッセージ件数
    pub async fn message_count(&self) -> usize {
        self.messages.lock().await.len()
    }
}

#[async_trait]
impl PresenceStore for InMemoryPresenceStore {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let cutoff = user.last_seen.minus_secs(USER_RETENTION_SECS);
        let mut users = self.users.lock().await;
        users.retain(|_, stored| stored.last_seen >= cutoff);
        users.insert(user.connection_id.clone(), user.clone());
        Ok(())
    }

    async fn update_user_position(
        &self,
        connection_id: &ConnectionId,
        position: Option<Coordinates>,
        seen_at: Timestamp,
    ) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        match users.get_mut(connection_id) {
            Some(user) => {
                user.position = position;
                user.last_seen = seen_at;
                Ok(())
            }
            None => Err(StoreError::OperationFailed(format!(
                "no stored user for connection '{connection_id}'"
            ))),
        }
    }

    async fn append_message(&self, message: &MessageEvent) -> Result<(), StoreError> {
        let cutoff = message.timestamp.minus_secs(self.message_retention_secs);
        let mut messages = self.messages.lock().await;
        while messages.front().is_some_and(|oldest| oldest.timestamp < cutoff) {
            messages.pop_front();
        }
        messages.push_back(message.clone());
        Ok(())
    }

    async fn query_recent_messages_near(
        &self,
        origin: &Coordinates,
        radius_meters: f64,
        since: Timestamp,
    ) -> Result<Vec<MessageEvent>, StoreError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .iter()
            .rev()
            .filter(|m| m.timestamp >= since)
            .filter(|m| distance_between(origin, &m.position) <= radius_meters)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, MessageText};

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn message(id: &str, text: &str, lat: f64, lon: f64, at: i64) -> MessageEvent {
        MessageEvent {
            sender_connection_id: conn(id),
            sender_name: DisplayName::new(id),
            text: MessageText::new(text.to_string()).unwrap(),
            position: Coordinates::new(lat, lon).unwrap(),
            timestamp: Timestamp::new(at),
        }
    }

    #[tokio::test]
    async fn test_upsert_user_replaces_row() {
        // テスト項目: 同じ接続のユーザー行は置換される
        // given (前提条件):
        let store = InMemoryPresenceStore::new();
        let first = UserRecord::new(conn("alice"), DisplayName::new("A"), None, Timestamp::new(1));
        let second = UserRecord::new(
            conn("alice"),
            DisplayName::new("Alice"),
            Some(Coordinates::new(1.0, 2.0).unwrap()),
            Timestamp::new(2),
        );

        // when (操作):
        store.upsert_user(&first).await.unwrap();
        store.upsert_user(&second).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.user(&conn("alice")).await, Some(second));
    }

    #[tokio::test]
    async fn test_update_user_position() {
        // テスト項目: 保存済みユーザーの位置を更新でき、未保存ならエラー
        // given (前提条件):
        let store = InMemoryPresenceStore::new();
        let user = UserRecord::new(conn("alice"), DisplayName::new("A"), None, Timestamp::new(1));
        store.upsert_user(&user).await.unwrap();
        let position = Some(Coordinates::new(3.0, 4.0).unwrap());

        // when (操作):
        let ok = store
            .update_user_position(&conn("alice"), position, Timestamp::new(5))
            .await;
        let missing = store
            .update_user_position(&conn("bob"), position, Timestamp::new(5))
            .await;

        // then (期待する結果):
        assert!(ok.is_ok());
        assert!(matches!(missing, Err(StoreError::OperationFailed(_))));
        let stored = store.user(&conn("alice")).await.unwrap();
        assert_eq!(stored.position, position);
        assert_eq!(stored.last_seen, Timestamp::new(5));
    }

    #[tokio::test]
    async fn test_query_recent_messages_near_filters_window_and_radius() {
        // テスト項目: 期間内かつ半径内のメッセージだけが新しい順に返される
        // given (前提条件):
        let store = InMemoryPresenceStore::new();
        store
            .append_message(&message("a", "old", 10.0, 20.0, 1_000))
            .await
            .unwrap();
        store
            .append_message(&message("b", "near", 10.0, 20.0001, 5_000))
            .await
            .unwrap();
        store
            .append_message(&message("c", "far", 10.0, 20.01, 6_000))
            .await
            .unwrap();
        store
            .append_message(&message("d", "newest", 10.0, 20.0, 7_000))
            .await
            .unwrap();

        // when (操作):
        let origin = Coordinates::new(10.0, 20.0).unwrap();
        let result = store
            .query_recent_messages_near(&origin, 30.0, Timestamp::new(2_000))
            .await
            .unwrap();

        // then (期待する結果):
        let texts: Vec<&str> = result.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["newest", "near"]);
        assert_eq!(store.message_count().await, 4);
    }

    #[tokio::test]
    async fn test_append_message_drops_expired_messages() {
        // テスト項目: 保持期間を過ぎたメッセージは追記時に取り除かれる
        // given (前提条件):
        let store = InMemoryPresenceStore::with_retention(60);
        store
            .append_message(&message("a", "expired", 10.0, 20.0, 1_000))
            .await
            .unwrap();
        store
            .append_message(&message("b", "kept", 10.0, 20.0, 30_000))
            .await
            .unwrap();

        // when (操作):
        store
            .append_message(&message("c", "latest", 10.0, 20.0, 70_000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(store.message_count().await, 2);
        let origin = Coordinates::new(10.0, 20.0).unwrap();
        let result = store
            .query_recent_messages_near(&origin, 30.0, Timestamp::new(0))
            .await
            .unwrap();
        let texts: Vec<&str> = result.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["latest", "kept"]);
    }

    #[tokio::test]
    async fn test_upsert_user_evicts_stale_rows() {
        // テスト項目: 長く更新のないユーザー行は新しい行の挿入時に取り除かれる
        // given (前提条件):
        let store = InMemoryPresenceStore::new();
        let stale = UserRecord::new(conn("old"), DisplayName::new("Old"), None, Timestamp::new(0));
        let recent = UserRecord::new(
            conn("recent"),
            DisplayName::new("Recent"),
            None,
            Timestamp::new(USER_RETENTION_SECS * 1000),
        );
        store.upsert_user(&stale).await.unwrap();
        store.upsert_user(&recent).await.unwrap();

        // when (操作):
        let newcomer = UserRecord::new(
            conn("new"),
            DisplayName::new("New"),
            None,
            Timestamp::new(USER_RETENTION_SECS * 1000 + 1),
        );
        store.upsert_user(&newcomer).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.user(&conn("old")).await, None);
        assert!(store.user(&conn("recent")).await.is_some());
        assert_eq!(store.user_count().await, 2);
    }
}
