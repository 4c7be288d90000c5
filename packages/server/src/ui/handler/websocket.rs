//! WebSocket connection handlers.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{ChatEvent, ConnectionId, validation::validate_ws_message},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::ConnectError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register before upgrading so capacity can be refused with a plain HTTP status.
    // The initial snapshot is queued on `tx` inside the UseCase.
    match state.connect_client_usecase.execute(tx).await {
        Ok(connection_id) => {
            tracing::info!("Client {} connected and registered", connection_id);
            let state_for_failure = state.clone();
            Ok(ws
                .on_failed_upgrade(move |e| {
                    tracing::warn!("WebSocket upgrade for {} failed: {}", connection_id, e);
                    tokio::spawn(async move {
                        state_for_failure
                            .disconnect_client_usecase
                            .execute(connection_id)
                            .await;
                    });
                })
                .on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
        }
        Err(ConnectError::CapacityExceeded(max)) => {
            tracing::warn!("Connection limit of {} reached. Rejecting connection.", max);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(ConnectError::Registry(e)) => {
            tracing::error!("Failed to register connection: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Decode one inbound text frame into a domain event.
///
/// Returns `None` for anything that is not a well-formed `message` or
/// `typing` event; such frames are dropped without closing the connection.
fn decode_client_event(text: &str) -> Option<ChatEvent> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse frame as JSON: {}", e);
            return None;
        }
    };

    if !validate_ws_message(&value) {
        tracing::warn!("Dropping invalid frame: {}", value);
        return None;
    }

    // JSON -> DTO -> Domain Model
    let event = serde_json::from_value::<ClientEvent>(value)
        .map_err(|e| e.to_string())
        .and_then(|dto| ChatEvent::try_from(dto).map_err(|e| e.to_string()));

    match event {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!("Dropping undecodable frame: {}", e);
            None
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The same task drives the heartbeat: every `heartbeat_interval` a Ping is
/// sent, and the connection is closed when nothing arrived from the client
/// since the previous Ping.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
/// * `heartbeat_interval` - Delay between two pings
/// * `alive` - Set by the receive side whenever a frame arrives
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
    heartbeat_interval: Duration,
    alive: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(heartbeat_interval);
        heartbeat.tick().await; // First tick fires immediately; skip it.

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else {
                        break;
                    };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if !alive.swap(false, Ordering::Relaxed) {
                        tracing::info!("Heartbeat timeout, closing connection");
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();
    let alive = Arc::new(AtomicBool::new(true));

    let alive_clone = alive.clone();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            // Any inbound frame counts as a sign of life
            alive_clone.store(true, Ordering::Relaxed);

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from {}: {}", connection_id, text.as_str());

                    let Some(event) = decode_client_event(text.as_str()) else {
                        continue;
                    };

                    match state_clone
                        .relay_event_usecase
                        .execute(connection_id, event)
                        .await
                    {
                        Ok(delivered) => {
                            tracing::debug!(
                                "Relayed event from {} to {} clients",
                                connection_id,
                                delivered
                            );
                        }
                        Err(e) => {
                            tracing::warn!("Failed to relay event from {}: {}", connection_id, e);
                        }
                    }
                }
                Message::Pong(_) => {
                    tracing::debug!("Received pong from {}", connection_id);
                }
                Message::Ping(_) => {
                    // Pong is sent automatically by axum
                    tracing::debug!("Received ping from {}", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Client {} requested close", connection_id);
                    break;
                }
                Message::Binary(_) => {
                    tracing::warn!("Dropping binary frame from {}", connection_id);
                }
            }
        }
    });

    // Spawn a task to push events to this client and keep the heartbeat
    let mut send_task = pusher_loop(rx, sender, state.heartbeat_interval, alive);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state
        .disconnect_client_usecase
        .execute(connection_id)
        .await
    {
        tracing::info!("Client {} disconnected and removed from registry", connection_id);
    } else {
        tracing::warn!("Client {} was already removed from registry", connection_id);
    }
}
