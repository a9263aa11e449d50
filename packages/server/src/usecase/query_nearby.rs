//! UseCase: 近傍の問い合わせ（読み取りのみ）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Coordinates, MessagePusher, NeighborResult, Notification, PresenceRepository,
    ProximityConfig,
};

use super::{error::DispatchError, push_or_warn};

/// 近傍問い合わせのユースケース
pub struct QueryNearbyUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    config: ProximityConfig,
}

impl QueryNearbyUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        config: ProximityConfig,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            config,
        }
    }

    /// 接続の現在位置の近傍を `nearbyUsers` として返信する
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<NeighborResult>, DispatchError> {
        let record = self
            .repository
            .get(connection_id)
            .await
            .ok_or_else(|| DispatchError::NotRegistered(connection_id.to_string()))?;
        let position = record
            .position
            .ok_or_else(|| DispatchError::NoPosition(connection_id.to_string()))?;

        let neighbors = self
            .repository
            .find_nearby(&position, Some(connection_id), self.config.radius_meters)
            .await;

        push_or_warn(
            self.message_pusher.as_ref(),
            connection_id,
            &Notification::NearbyUsers(neighbors.clone()),
        )
        .await;

        Ok(neighbors)
    }

    /// 任意の地点の近傍（誰も除外しない）
    pub async fn around(&self, origin: &Coordinates) -> Vec<NeighborResult> {
        self.repository
            .find_nearby(origin, None, self.config.radius_meters)
            .await
    }
}
