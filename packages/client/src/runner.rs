//! Client execution logic with reconnection support.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        MAX_RECONNECT_ATTEMPTS, reconnect_delay, should_attempt_reconnect, validate_user,
    },
    error::ClientError,
    history::MessageHistory,
    input::spawn_input_thread,
    typing::{DEFAULT_IDLE_TIMEOUT, TypingNotifier, run_typing_notifier},
};

use super::session::{SessionInput, run_client_session};

/// Where to connect and as whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Display name attached to every message
    pub user: String,
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:5000/ws`
    pub ws_url: String,
    /// REST base URL, e.g. `http://127.0.0.1:5000/api`
    pub api_url: String,
}

/// Run the chat client with reconnection logic
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let config = ClientConfig {
        user: validate_user(&config.user)?,
        ..config
    };

    // Input and typing state outlive individual connections
    let channels = spawn_input_thread(&config.user);
    let (typing_tx, typing_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_typing_notifier(
        TypingNotifier::new(DEFAULT_IDLE_TIMEOUT),
        channels.signals,
        typing_tx,
    ));
    let mut input = SessionInput {
        lines: channels.lines,
        typing: typing_rx,
    };
    let history = Arc::new(Mutex::new(MessageHistory::new()));

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}'",
            config.ws_url,
            config.user
        );

        match run_client_session(&config, &mut input, history.clone()).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Disconnected: {}", e);

                // A connection that was up starts a fresh series of attempts
                if matches!(e, ClientError::ConnectionLost) {
                    reconnect_count = 0;
                }

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                reconnect_count += 1;
                let delay = reconnect_delay(reconnect_count);
                tracing::info!(
                    "Reconnecting in {} ms... (attempt {}/{})",
                    delay.as_millis(),
                    reconnect_count,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
