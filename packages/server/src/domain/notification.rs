//! 接続へ送られる通知（送信イベント）のドメインモデル
//!
//! ワイヤ形式への変換は Infrastructure 層（DTO）が担当します。

use super::{
    entity::{MessageEvent, NeighborResult},
    value_object::{ConnectionId, Coordinates, DisplayName},
};

/// 送信イベント
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// 近くにユーザーが登録した（`userJoined`）
    UserJoined {
        connection_id: ConnectionId,
        display_name: DisplayName,
        distance_meters: u32,
    },
    /// 近くのユーザー一覧のスナップショット（`nearbyUsers`）
    NearbyUsers(Vec<NeighborResult>),
    /// 近くのユーザーが移動した（`userLocationUpdated`）
    UserLocationUpdated {
        connection_id: ConnectionId,
        display_name: DisplayName,
        position: Coordinates,
        distance_meters: u32,
    },
    /// 近くのユーザーからのメッセージ（`newMessage`）
    NewMessage(MessageEvent),
    /// 送信者への送信確認（`messageSent`）
    MessageSent(MessageEvent),
    /// 近くのユーザーが切断した（`userLeft`）
    UserLeft {
        connection_id: ConnectionId,
        display_name: DisplayName,
    },
}

impl Notification {
    /// ワイヤ上のイベント名
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::UserJoined { .. } => "userJoined",
            Self::NearbyUsers(_) => "nearbyUsers",
            Self::UserLocationUpdated { .. } => "userLocationUpdated",
            Self::NewMessage(_) => "newMessage",
            Self::MessageSent(_) => "messageSent",
            Self::UserLeft { .. } => "userLeft",
        }
    }
}
