//! WebSocket and HTTP surface of the relay.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
