//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ConnectionId, InboundEvent},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::EventDispatcher,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// This handles the outbound flow: notifications addressed to this connection
/// (via the rx channel) are written to its WebSocket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Parse one text frame into a domain event, or `None` if it is malformed.
fn parse_frame(connection_id: &ConnectionId, text: &str) -> Option<InboundEvent> {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse frame from '{}': {}", connection_id, e);
            return None;
        }
    };
    match InboundEvent::try_from(event) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!("Invalid event from '{}': {}", connection_id, e);
            None
        }
    }
}

/// Read frames and dispatch them one at a time, in arrival order.
///
/// `stop` is only checked between frames: an event that has been received
/// always runs to completion. Returns when the stream ends, the peer closes
/// or `stop` fires.
async fn read_frames<S>(
    connection_id: &ConnectionId,
    mut receiver: S,
    dispatcher: &EventDispatcher,
    mut stop: oneshot::Receiver<()>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            biased;
            msg = receiver.next() => msg,
            _ = &mut stop => {
                tracing::debug!("Reader for '{}' stopped", connection_id);
                break;
            }
        };
        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received from '{}': {}", connection_id, text.as_str());
                if let Some(event) = parse_frame(connection_id, text.as_str()) {
                    dispatcher.dispatch(connection_id, event).await;
                }
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            _ => {}
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive notifications
    let (tx, rx) = mpsc::unbounded_channel();
    state.dispatcher.connect(connection_id.clone(), tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (stop_tx, stop_rx) = oneshot::channel();
    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        read_frames(
            &connection_id_clone,
            receiver,
            &state_clone.dispatcher,
            stop_rx,
        )
        .await;
    });

    let mut send_task = pusher_loop(rx, sender);

    let reader_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    if reader_finished {
        send_task.abort();
    } else {
        // The writer is gone; let the reader finish its current event first
        let _ = stop_tx.send(());
        if let Err(e) = recv_task.await {
            tracing::error!("Reader for '{}' failed: {}", connection_id, e);
        }
    }

    state.dispatcher.disconnect(&connection_id).await;
    tracing::info!("Connection '{}' closed", connection_id);
}
