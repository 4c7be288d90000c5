//! Domain entities.

use super::value_object::{MessageId, MessageText, Timestamp, UserName};

/// A stored chat message. Immutable once the store has assigned its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub user: UserName,
    pub text: MessageText,
    pub timestamp: Timestamp,
}

/// A message that has passed validation but has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub user: UserName,
    pub text: MessageText,
    /// Client supplied timestamp; the store fills in the receipt time when absent
    pub timestamp: Option<Timestamp>,
}

impl NewMessage {
    pub fn new(user: UserName, text: MessageText, timestamp: Option<Timestamp>) -> Self {
        // An empty timestamp counts as absent
        let timestamp = timestamp.filter(|t| !t.as_str().is_empty());
        Self {
            user,
            text,
            timestamp,
        }
    }
}
