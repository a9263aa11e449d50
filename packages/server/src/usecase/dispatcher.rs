//! Event dispatcher: the per-connection state machine
//! (`Unregistered → Registered → Disconnected`).
//!
//! The dispatcher owns the five transition use cases and is the only code
//! path that mutates the presence registry. Every "not registered" or
//! "no known position" outcome is a benign no-op that is logged, never
//! surfaced to the client.

use std::sync::Arc;

use vicinity_shared::time::Clock;

use crate::domain::{
    ConnectionId, InboundEvent, MessagePusher, PresenceRepository, PresenceStore,
    ProximityConfig, PusherChannel,
};

use super::{
    DisconnectUserUseCase, DispatchError, QueryNearbyUseCase, RegisterUserUseCase,
    SendMessageUseCase, UpdateLocationUseCase,
};

pub struct EventDispatcher {
    message_pusher: Arc<dyn MessagePusher>,
    register_user: RegisterUserUseCase,
    update_location: UpdateLocationUseCase,
    send_message: SendMessageUseCase,
    query_nearby: Arc<QueryNearbyUseCase>,
    disconnect_user: DisconnectUserUseCase,
}

impl EventDispatcher {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        store: Arc<dyn PresenceStore>,
        clock: Arc<dyn Clock>,
        config: ProximityConfig,
    ) -> Self {
        Self {
            register_user: RegisterUserUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                store.clone(),
                clock.clone(),
                config,
            ),
            update_location: UpdateLocationUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                store.clone(),
                clock.clone(),
                config,
            ),
            send_message: SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                store,
                clock,
                config,
            ),
            query_nearby: Arc::new(QueryNearbyUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                config,
            )),
            disconnect_user: DisconnectUserUseCase::new(repository, message_pusher.clone(), config),
            message_pusher,
        }
    }

    /// Read-only proximity queries, shared with the HTTP surface.
    pub fn query_nearby_usecase(&self) -> Arc<QueryNearbyUseCase> {
        self.query_nearby.clone()
    }

    /// A new connection was opened. It stays unregistered until its first
    /// `register` event.
    pub async fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
    }

    /// Handle one inbound event. Events from a single connection must be
    /// dispatched sequentially.
    pub async fn dispatch(&self, connection_id: &ConnectionId, event: InboundEvent) {
        let event_name = event.event_name();
        let outcome = match event {
            InboundEvent::Register {
                display_name,
                position,
            } => {
                self.register_user
                    .execute(connection_id.clone(), display_name, position)
                    .await;
                Ok(())
            }
            InboundEvent::UpdateLocation { position } => self
                .update_location
                .execute(connection_id, position)
                .await
                .map(drop),
            InboundEvent::SendMessage { text } => self
                .send_message
                .execute(connection_id, text)
                .await
                .map(drop),
            InboundEvent::GetNearbyUsers => {
                self.query_nearby.execute(connection_id).await.map(drop)
            }
        };
        log_ignored(event_name, outcome);
    }

    /// The connection closed. Terminal.
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        let outcome = self.disconnect_user.execute(connection_id).await.map(drop);
        log_ignored("disconnect", outcome);
    }
}

fn log_ignored(event_name: &str, outcome: Result<(), DispatchError>) {
    if let Err(e) = outcome {
        tracing::debug!("Ignored '{}': {}", event_name, e);
    }
}
