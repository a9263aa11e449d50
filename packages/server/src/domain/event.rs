//! 接続から受け取るイベント（受信イベント）のドメインモデル

use super::value_object::{Coordinates, DisplayName, MessageText};

/// 受信イベント
///
/// 座標が不正・欠落している場合は `position: None`（位置不明）として表現する。
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `register`
    Register {
        display_name: DisplayName,
        position: Option<Coordinates>,
    },
    /// `updateLocation`
    UpdateLocation { position: Option<Coordinates> },
    /// `sendMessage`
    SendMessage { text: MessageText },
    /// `getNearbyUsers`
    GetNearbyUsers,
}

impl InboundEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::UpdateLocation { .. } => "updateLocation",
            Self::SendMessage { .. } => "sendMessage",
            Self::GetNearbyUsers => "getNearbyUsers",
        }
    }
}
