//! Value Objects
//!
//! 生成時に検証を行い、不正な値がドメインに入り込まないようにします。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// 表示名の最大文字数
pub const DISPLAY_NAME_MAX_CHARS: usize = 64;

/// メッセージ本文の最大文字数
pub const MESSAGE_TEXT_MAX_CHARS: usize = 1000;

/// 接続 ID
///
/// トランスポート層が接続ごとに割り当てる不透明なトークン。
/// Presence Registry の主キーとして使われる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 新しい ConnectionId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    /// ランダムな ConnectionId を生成（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表示名
///
/// ユーザー入力のため空でもよい。前後の空白を除去し、最大文字数で切り詰める。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(
            value
                .as_ref()
                .trim()
                .chars()
                .take(DISPLAY_NAME_MAX_CHARS)
                .collect(),
        )
    }

    /// 入力が無い場合は空の表示名
    pub fn from_input(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 緯度・経度（度）
///
/// 有限値かつ緯度 [-90, 90]、経度 [-180, 180] の範囲にあるもののみ生成できる。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValueObjectError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ValueObjectError::InvalidCoordinates(format!(
                "({latitude}, {longitude}) is not finite"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValueObjectError::InvalidCoordinates(format!(
                "({latitude}, {longitude}) is out of range"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// メッセージ本文
///
/// 空白のみの本文と最大文字数を超える本文は不正な入力として扱う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyMessageText);
        }
        let actual = value.chars().count();
        if actual > MESSAGE_TEXT_MAX_CHARS {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_CHARS,
                actual,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒、UTC）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 指定秒数だけ過去のタイムスタンプ
    pub fn minus_secs(&self, secs: i64) -> Self {
        Self(self.0.saturating_sub(secs.saturating_mul(1000)))
    }
}
