//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{EventDispatcher, GetRecentMessagesUseCase};

use super::{
    handler::{get_nearby_users, get_recent_messages, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Proximity chat relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(dispatcher, get_recent_messages_usecase);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// EventDispatcher（接続ごとの状態遷移）
    dispatcher: Arc<EventDispatcher>,
    /// GetRecentMessagesUseCase（最近のメッセージ取得）
    get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
}

impl Server {
    pub fn new(
        dispatcher: Arc<EventDispatcher>,
        get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    ) -> Self {
        Self {
            dispatcher,
            get_recent_messages_usecase,
        }
    }

    /// Build the router with all endpoints.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            query_nearby_usecase: self.dispatcher.query_nearby_usecase(),
            dispatcher: self.dispatcher.clone(),
            get_recent_messages_usecase: self.get_recent_messages_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/users/nearby", get(get_nearby_users))
            .route("/api/messages/recent", get(get_recent_messages))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Serve on an already bound listener until a shutdown signal arrives.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        tracing::info!(
            "Proximity chat relay listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Run the relay
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);

        self.serve(listener).await
    }
}
