//! UseCase テスト用のヘルパー

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::{
    domain::{
        ConnectionId, Coordinates, DisplayName, MessagePushError, MessagePusher, Notification,
        PresenceRepository, PusherChannel, Timestamp,
    },
    infrastructure::repository::InMemoryPresenceRepository,
};

/// 送信内容を記録する MessagePusher
///
/// `fail_for` に含まれる接続への送信は失敗する。
#[derive(Default)]
pub struct RecordingPusher {
    sent: Mutex<Vec<(ConnectionId, Notification)>>,
    fail_for: HashSet<ConnectionId>,
    unregistered: Mutex<Vec<ConnectionId>>,
}

impl RecordingPusher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_for(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            fail_for: ids.iter().map(|id| conn(id)).collect(),
            ..Self::default()
        })
    }

    /// 記録された全ての送信
    pub fn sent(&self) -> Vec<(ConnectionId, Notification)> {
        self.sent.lock().unwrap().clone()
    }

    /// 指定した接続に届いた通知
    pub fn sent_to(&self, id: &str) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|(target, _)| target.as_str() == id)
            .map(|(_, notification)| notification)
            .collect()
    }

    /// 指定したイベント名の送信先（ソート済み）
    pub fn recipients_of(&self, event_name: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sent()
            .into_iter()
            .filter(|(_, notification)| notification.event_name() == event_name)
            .map(|(target, _)| target.into_string())
            .collect();
        ids.sort();
        ids
    }

    pub fn unregistered(&self) -> Vec<ConnectionId> {
        self.unregistered.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.unregistered
            .lock()
            .unwrap()
            .push(connection_id.clone());
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        if self.fail_for.contains(connection_id) {
            return Err(MessagePushError::PushFailed("channel closed".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((connection_id.clone(), notification.clone()));
        Ok(())
    }
}

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub fn coords(lat: f64, lon: f64) -> Coordinates {
    Coordinates::new(lat, lon).unwrap()
}

/// Registry に直接ユーザーを置く
pub async fn seed_user(
    repository: &InMemoryPresenceRepository,
    id: &str,
    position: Option<(f64, f64)>,
) {
    repository
        .upsert(
            conn(id),
            DisplayName::new(id),
            position.map(|(lat, lon)| coords(lat, lon)),
            Timestamp::new(1),
        )
        .await;
}
