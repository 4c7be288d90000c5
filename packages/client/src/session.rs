//! WebSocket client session management.

use std::sync::Arc;

use buzz_server::infrastructure::dto::{
    http::CreateMessageRequest,
    websocket::{ClientEvent, ServerEvent, TypingData},
};
use buzz_shared::time::now_iso8601;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    error::ClientError, formatter::MessageFormatter, history::MessageHistory, typing::TypingUsers,
};

use super::{runner::ClientConfig, ui::print_and_redisplay};

/// Local input shared by every session of one client run
pub struct SessionInput {
    /// Lines to submit
    pub lines: mpsc::UnboundedReceiver<String>,
    /// Typing transitions produced by the notifier
    pub typing: mpsc::UnboundedReceiver<bool>,
}

/// Render one server event; returns the text to print, if any.
pub(crate) fn render_event(
    event: ServerEvent,
    local_user: &str,
    history: &mut MessageHistory,
    typing_users: &mut TypingUsers,
) -> Option<String> {
    match event {
        ServerEvent::InitialMessages(snapshot) => {
            let added = history.merge_snapshot(snapshot);
            Some(MessageFormatter::format_initial_messages(&added, local_user))
        }
        ServerEvent::Message(message) => {
            if !history.insert(message.clone()) {
                return None;
            }
            Some(MessageFormatter::format_chat_message(&message, local_user))
        }
        ServerEvent::Typing(typing) => {
            if !typing_users.apply(&typing) {
                return None;
            }
            MessageFormatter::format_typing_notice(&typing_users.visible())
        }
    }
}

/// Submit a line through the REST API
async fn post_line(
    http: &reqwest::Client,
    messages_url: &str,
    user: &str,
    line: String,
) -> Result<(), ClientError> {
    let request = CreateMessageRequest {
        user: user.to_string(),
        message: line,
        timestamp: Some(now_iso8601()),
    };

    let response = http.post(messages_url).json(&request).send().await?;
    if !response.status().is_success() {
        return Err(ClientError::RequestError(format!(
            "HTTP {}",
            response.status()
        )));
    }
    Ok(())
}

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the local user ends input, and an error when the
/// connection could not be established or was lost.
pub async fn run_client_session(
    config: &ClientConfig,
    input: &mut SessionInput,
    history: Arc<Mutex<MessageHistory>>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(config.ws_url.as_str()).await?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        config.user
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let user_for_read = config.user.clone();
    let mut read_task = tokio::spawn(async move {
        let mut typing_users = TypingUsers::new(user_for_read.clone());

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let output = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => {
                            let mut history = history.lock().await;
                            render_event(event, &user_for_read, &mut history, &mut typing_users)
                        }
                        Err(e) => {
                            tracing::debug!("Unrecognized event: {}", e);
                            Some(MessageFormatter::format_raw_message(text.as_str()))
                        }
                    };
                    if let Some(output) = output {
                        print_and_redisplay(&output, &user_for_read);
                    }
                }
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print_and_redisplay(&formatted, &user_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let http = reqwest::Client::new();
    let messages_url = format!("{}/messages", config.api_url.trim_end_matches('/'));

    // Forward local input until the user quits or the connection drops
    loop {
        tokio::select! {
            _ = &mut read_task => {
                break Err(ClientError::ConnectionLost);
            }
            line = input.lines.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    let _ = write.send(Message::Close(None)).await;
                    break Ok(());
                };
                if let Err(e) = post_line(&http, &messages_url, &config.user, line).await {
                    tracing::warn!("Failed to post message: {}", e);
                    print_and_redisplay(
                        &MessageFormatter::format_send_failure(&e.to_string()),
                        &config.user,
                    );
                }
            }
            Some(is_typing) = input.typing.recv() => {
                let event = ClientEvent::Typing(TypingData {
                    user: config.user.clone(),
                    is_typing,
                });
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize typing event: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::text(json)).await {
                    tracing::warn!("Failed to send typing event: {}", e);
                    read_task.abort();
                    break Err(ClientError::ConnectionLost);
                }
            }
        }
    }
}
