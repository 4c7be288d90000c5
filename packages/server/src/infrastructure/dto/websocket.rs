//! WebSocket event DTOs.
//!
//! Every frame is a JSON object of the form `{"type": ..., "data": ...}`.

use serde::{Deserialize, Serialize};

/// Events sent from the server to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    InitialMessages(Vec<MessageData>),
    Message(MessageData),
    Typing(TypingData),
}

/// Events sent from clients to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Message(NewMessageData),
    Typing(TypingData),
}

/// Message payload pushed to clients.
///
/// Stored messages always carry `id` and `timestamp`; messages relayed from a
/// peer's stream were never stored and may lack both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Message payload streamed by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessageData {
    pub user: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingData {
    pub user: String,
    #[serde(rename = "isTyping")]
    pub is_typing: bool,
}
