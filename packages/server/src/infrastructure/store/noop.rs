//! 何もしない PresenceStore

use async_trait::async_trait;

use crate::domain::{
    ConnectionId, Coordinates, MessageEvent, PresenceStore, StoreError, Timestamp, UserRecord,
};

/// 永続化を行わない PresenceStore
///
/// 書き込みは常に成功し、問い合わせは常に空を返す。
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenceStore;

#[async_trait]
impl PresenceStore for NoopPresenceStore {
    async fn upsert_user(&self, _user: &UserRecord) -> Result<(), StoreError> {
        Ok(())
    }

    async fn update_user_position(
        &self,
        _connection_id: &ConnectionId,
        _position: Option<Coordinates>,
        _seen_at: Timestamp,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn append_message(&self, _message: &MessageEvent) -> Result<(), StoreError> {
        Ok(())
    }

    async fn query_recent_messages_near(
        &self,
        _origin: &Coordinates,
        _radius_meters: f64,
        _since: Timestamp,
    ) -> Result<Vec<MessageEvent>, StoreError> {
        Ok(Vec::new())
    }
}
