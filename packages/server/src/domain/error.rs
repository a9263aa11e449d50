//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// 接続 ID が空
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    /// 座標が有限値でない、または範囲外
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// メッセージ本文が空
    #[error("message text must not be empty")]
    EmptyMessageText,

    /// メッセージ本文が長すぎる
    #[error("message text exceeds {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先の接続が見つからない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// 送信チャンネルが閉じている
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// ペイロードのシリアライズに失敗
    #[error("failed to serialize notification: {0}")]
    Serialization(String),
}

/// 永続化ストアのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// ストアが利用できない
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// 書き込みまたは読み込みに失敗
    #[error("store operation failed: {0}")]
    OperationFailed(String),
}
