//! UseCase: 位置更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateLocationUseCase::execute() メソッド
//! - 移動後の近傍の再計算と `userLocationUpdated` の通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：移動後も近くにいるユーザーへの通知
//! - エッジケース：遠ざかったユーザーには通知されない、位置不明への更新
//! - 異常系：未登録の接続からの更新（no-op）

use std::sync::Arc;

use vicinity_shared::time::Clock;

use crate::domain::{
    ConnectionId, Coordinates, MessagePusher, Notification, PresenceRepository, PresenceStore,
    ProximityConfig, Timestamp,
};

use super::{error::DispatchError, log_store_result, push_or_warn};

/// 位置更新のユースケース
pub struct UpdateLocationUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    store: Arc<dyn PresenceStore>,
    clock: Arc<dyn Clock>,
    config: ProximityConfig,
}

impl UpdateLocationUseCase {
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

    /// 位置更新を実行
    ///
    /// `position` が `None` の場合、レコードは位置不明になり誰にも通知しない。
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 通知した近傍の接続 ID
    /// * `Err(DispatchError::NotRegistered)` - 未登録の接続（何も変更しない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        position: Option<Coordinates>,
    ) -> Result<Vec<ConnectionId>, DispatchError> {
        let seen_at = Timestamp::new(self.clock.now_millis());

        // 1. Registry を更新（未登録なら no-op）
        let record = self
            .repository
            .update_position(connection_id, position, seen_at)
            .await
            .ok_or_else(|| DispatchError::NotRegistered(connection_id.to_string()))?;

        // 2. 新しい位置での近傍に通知
        let mut notified = Vec::new();
        if let Some(position) = record.position {
            let neighbors = self
                .repository
                .find_nearby(&position, Some(connection_id), self.config.radius_meters)
                .await;

            for neighbor in neighbors {
                let updated = Notification::UserLocationUpdated {
                    connection_id: connection_id.clone(),
                    display_name: record.display_name.clone(),
                    position,
                    distance_meters: neighbor.distance_meters,
                };
                push_or_warn(
                    self.message_pusher.as_ref(),
                    &neighbor.connection_id,
                    &updated,
                )
                .await;
                notified.push(neighbor.connection_id);
            }
        } else {
            tracing::debug!("Connection '{}' is now positionless", connection_id);
        }

        // 3. 永続化（ベストエフォート）
        log_store_result(
            "position",
            connection_id,
            self.store
                .update_user_position(connection_id, record.position, seen_at)
                .await,
        );

        Ok(notified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, StoreError, store::MockPresenceStore},
        infrastructure::{repository::InMemoryPresenceRepository, store::NoopPresenceStore},
        usecase::test_support::{RecordingPusher, conn, coords, seed_user},
    };
    use vicinity_shared::time::FixedClock;

    fn create_usecase(
        repository: Arc<InMemoryPresenceRepository>,
        pusher: Arc<RecordingPusher>,
        store: Arc<dyn PresenceStore>,
    ) -> UpdateLocationUseCase {
        UpdateLocationUseCase::new(
            repository,
            pusher,
            store,
            Arc::new(FixedClock::new(9_000)),
            ProximityConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_update_location_notifies_current_neighbors() {
        // テスト項目: 移動後の位置で近くにいるユーザーだけに userLocationUpdated が届く
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let pusher = RecordingPusher::new();
        seed_user(&repository, "mover", Some((10.0, 20.0))).await;
        seed_user(&repository, "old_peer", Some((10.0, 20.0))).await;
        seed_user(&repository, "new_peer", Some((10.0, 20.001))).await;
        let usecase =
            create_usecase(repository.clone(), pusher.clone(), Arc::new(NoopPresenceStore));

        // when (操作):
        let result = usecase
            .execute(&conn("mover"), Some(coords(10.0, 20.001)))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![conn("new_peer")]));
        assert!(pusher.sent_to("old_peer").is_empty());
        assert_eq!(
            pusher.sent_to("new_peer"),
            vec![Notification::UserLocationUpdated {
                connection_id: conn("mover"),
                display_name: DisplayName::new("mover"),
                position: coords(10.0, 20.001),
                distance_meters: 0,
            }]
        );

        let record = repository.get(&conn("mover")).await.unwrap();
        assert_eq!(record.position, Some(coords(10.0, 20.001)));
        assert_eq!(record.last_seen, Timestamp::new(9_000));
    }

    #[tokio::test]
    async fn test_update_location_unregistered_is_noop() {
        // テスト項目: 未登録の接続からの更新は何もしない
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let pusher = RecordingPusher::new();
        seed_user(&repository, "peer", Some((10.0, 20.0))).await;
        let usecase =
            create_usecase(repository.clone(), pusher.clone(), Arc::new(NoopPresenceStore));

        // when (操作):
        let result = usecase
            .execute(&conn("ghost"), Some(coords(10.0, 20.0)))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DispatchError::NotRegistered("ghost".to_string()))
        );
        assert!(pusher.sent().is_empty());
        assert!(repository.get(&conn("ghost")).await.is_none());
    }

    #[tokio::test]
    async fn test_update_location_to_positionless() {
        // テスト項目: 不正な座標での更新は位置不明となり、近接計算から外れる
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let pusher = RecordingPusher::new();
        seed_user(&repository, "mover", Some((10.0, 20.0))).await;
        seed_user(&repository, "peer", Some((10.0, 20.0))).await;
        let usecase =
            create_usecase(repository.clone(), pusher.clone(), Arc::new(NoopPresenceStore));

        // when (操作):
        let result = usecase.execute(&conn("mover"), None).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
        assert!(pusher.sent().is_empty());
        let nearby = repository
            .find_nearby(&coords(10.0, 20.0), Some(&conn("peer")), 30.0)
            .await;
        assert!(nearby.is_empty());
    }

    #[tokio::test]
    async fn test_update_location_swallows_store_error() {
        // テスト項目: 永続化に失敗しても Registry の更新と通知は行われる
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let pusher = RecordingPusher::new();
        let mut store = MockPresenceStore::new();
        store
            .expect_update_user_position()
            .times(1)
            .returning(|_, _, _| Err(StoreError::OperationFailed("timeout".to_string())));
        seed_user(&repository, "mover", Some((10.0, 20.0))).await;
        seed_user(&repository, "peer", Some((10.0, 20.0))).await;
        let usecase = create_usecase(repository.clone(), pusher.clone(), Arc::new(store));

        // when (操作):
        let result = usecase
            .execute(&conn("mover"), Some(coords(10.0, 20.0001)))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![conn("peer")]));
        assert_eq!(pusher.recipients_of("userLocationUpdated"), vec!["peer"]);
    }
}
