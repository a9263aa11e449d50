//! Proximity chat relay server.
//!
//! Presence and chat events are delivered only to clients within a fixed
//! radius of each other.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin vicinity-server
//! cargo run --bin vicinity-server -- --host 0.0.0.0 --port 3000 --radius-meters 50 --store none
//! ```

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use vicinity_server::{
    domain::{
        PROXIMITY_RADIUS_METERS, PresenceStore, ProximityConfig, RECENT_MESSAGE_WINDOW_SECS,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryPresenceRepository,
        store::{InMemoryPresenceStore, NoopPresenceStore},
    },
    ui::Server,
    usecase::{EventDispatcher, GetRecentMessagesUseCase},
};
use vicinity_shared::{logger::setup_logger, time::SystemClock};

/// Persistence backend for users and messages
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreKind {
    /// Keep a user table and message log in process memory
    Memory,
    /// Do not persist anything
    #[value(name = "none")]
    Noop,
}

#[derive(Parser, Debug)]
#[command(name = "vicinity-server")]
#[command(about = "Location-aware WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Radius that defines "nearby", in meters
    #[arg(long, default_value_t = PROXIMITY_RADIUS_METERS)]
    radius_meters: f64,

    /// Look-back window for the recent-messages endpoint, in seconds
    #[arg(long, default_value_t = RECENT_MESSAGE_WINDOW_SECS)]
    message_window_secs: i64,

    /// Persistence backend
    #[arg(long, value_enum, default_value_t = StoreKind::Memory)]
    store: StoreKind,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ProximityConfig {
        radius_meters: args.radius_meters,
        message_window_secs: args.message_window_secs,
    };
    tracing::info!(
        "Proximity radius {}m, message window {}s, store {:?}",
        config.radius_meters,
        config.message_window_secs,
        args.store
    );

    // Initialize dependencies in order:
    // 1. Repository / MessagePusher / Store / Clock
    // 2. UseCases
    // 3. Server
    let repository = Arc::new(InMemoryPresenceRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let store: Arc<dyn PresenceStore> = match args.store {
        StoreKind::Memory => Arc::new(InMemoryPresenceStore::with_retention(
            config.message_window_secs,
        )),
        StoreKind::Noop => Arc::new(NoopPresenceStore),
    };
    let clock = Arc::new(SystemClock);

    let dispatcher = Arc::new(EventDispatcher::new(
        repository,
        message_pusher,
        store.clone(),
        clock.clone(),
        config,
    ));
    let get_recent_messages_usecase =
        Arc::new(GetRecentMessagesUseCase::new(store, clock, config));

    let server = Server::new(dispatcher, get_recent_messages_usecase);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
