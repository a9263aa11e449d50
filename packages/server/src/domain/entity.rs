//! Entities

use super::value_object::{ConnectionId, Coordinates, DisplayName, MessageText, Timestamp};

/// 接続中のユーザー
///
/// Registry にエントリが存在する ⇔ 接続が開いている。
/// `position` が `None` の間は近接計算の対象外。
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub position: Option<Coordinates>,
    pub last_seen: Timestamp,
}

impl UserRecord {
    pub fn new(
        connection_id: ConnectionId,
        display_name: DisplayName,
        position: Option<Coordinates>,
        last_seen: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            display_name,
            position,
            last_seen,
        }
    }
}

/// 近接検索の結果（保存されない派生値）
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborResult {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    /// 最も近い整数メートルに丸めた距離
    pub distance_meters: u32,
    pub position: Coordinates,
}

/// 近接チャットのメッセージ
///
/// 送信ごとに 1 つ生成され、近くの接続へファンアウトされる。
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub sender_connection_id: ConnectionId,
    pub sender_name: DisplayName,
    pub text: MessageText,
    pub position: Coordinates,
    pub timestamp: Timestamp,
}
