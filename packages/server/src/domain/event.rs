//! Events fanned out to live connections.

use super::{
    entity::{Message, NewMessage},
    value_object::UserName,
};

/// Typing presence signal for a single user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSignal {
    pub user: UserName,
    pub is_typing: bool,
}

impl TypingSignal {
    pub fn started(user: UserName) -> Self {
        Self {
            user,
            is_typing: true,
        }
    }

    pub fn stopped(user: UserName) -> Self {
        Self {
            user,
            is_typing: false,
        }
    }
}

/// Everything the server pushes over a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Snapshot of recent history, sent once to a freshly opened connection
    InitialMessages(Vec<Message>),
    /// A message that the store has accepted
    MessageCreated(Message),
    /// A message streamed by a peer, relayed without being stored
    MessageRelayed(NewMessage),
    Typing(TypingSignal),
}
