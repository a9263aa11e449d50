//! PresenceStore の実装
//!
//! - `noop`: 何も保存しない（純粋なインメモリ運用）
//! - `inmemory`: プロセス内に保持するユーザー行とメッセージログ

pub mod inmemory;
pub mod noop;

pub use inmemory::InMemoryPresenceStore;
pub use noop::NoopPresenceStore;
