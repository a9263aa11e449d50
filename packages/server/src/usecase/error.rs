//! UseCase 層のエラー定義

use thiserror::Error;

/// 受信イベントを処理しなかった理由
///
/// どちらも想定内の no-op であり、クライアントには返さない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// 接続が Registry に登録されていない
    #[error("connection '{0}' is not registered")]
    NotRegistered(String),

    /// 接続の位置が不明
    #[error("connection '{0}' has no known position")]
    NoPosition(String),
}
