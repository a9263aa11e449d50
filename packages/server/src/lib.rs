//! Location-aware real-time chat relay.
//!
//! Clients register a position over WebSocket; presence and chat events are
//! delivered only to clients within a fixed radius of each other.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
