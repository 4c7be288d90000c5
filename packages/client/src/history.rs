//! Client-side view of the message log.
//!
//! The same stored message can reach the client twice: once in a snapshot
//! and once as a live broadcast, or again in the snapshot after a reconnect.
//! Messages are keyed by id so each one is rendered once, in id order.

use std::collections::BTreeMap;

use buzz_server::infrastructure::dto::websocket::MessageData;

#[derive(Debug, Default)]
pub struct MessageHistory {
    messages: BTreeMap<u64, MessageData>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; returns `true` if it had not been seen before.
    ///
    /// Messages without an id were relayed from a peer's stream and are never
    /// deduplicated.
    pub fn insert(&mut self, message: MessageData) -> bool {
        let Some(id) = message.id else {
            return true;
        };
        if self.messages.contains_key(&id) {
            return false;
        }
        self.messages.insert(id, message);
        true
    }

    /// Merge a snapshot and return the messages it added, ordered by id.
    pub fn merge_snapshot(&mut self, snapshot: Vec<MessageData>) -> Vec<MessageData> {
        let mut added: Vec<MessageData> = snapshot
            .into_iter()
            .filter(|message| message.id.is_some())
            .filter(|message| self.insert(message.clone()))
            .collect();
        added.sort_by_key(|message| message.id);
        added
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages in id order
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &MessageData> {
        self.messages.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: u64, text: &str) -> MessageData {
        MessageData {
            id: Some(id),
            user: "Alice".to_string(),
            message: text.to_string(),
            timestamp: Some("2025-08-06T08:00:00.000Z".to_string()),
        }
    }

    #[test]
    fn test_insert_deduplicates_by_id() {
        // テスト項目: 同じ ID のメッセージは一度しか記録されない
        // given (前提条件):
        let mut history = MessageHistory::new();

        // when (操作):
        let first = history.insert(stored(1, "hi"));
        let second = history.insert(stored(1, "hi"));

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_relayed_messages_are_never_deduplicated() {
        // テスト項目: ID のない中継メッセージは毎回新規として扱われ、履歴には残らない
        // given (前提条件):
        let mut history = MessageHistory::new();
        let relayed = MessageData {
            id: None,
            user: "Bob".to_string(),
            message: "hey".to_string(),
            timestamp: None,
        };

        // when (操作):
        let first = history.insert(relayed.clone());
        let second = history.insert(relayed);

        // then (期待する結果):
        assert!(first);
        assert!(second);
        assert!(history.is_empty());
    }

    #[test]
    fn test_merge_snapshot_returns_only_unseen_messages_in_order() {
        // テスト項目: 再接続時のスナップショットからは未表示のメッセージだけが ID 順で返る
        // given (前提条件):
        let mut history = MessageHistory::new();
        history.insert(stored(2, "b"));
        history.insert(stored(3, "c"));

        // when (操作):
        let added = history.merge_snapshot(vec![
            stored(4, "d"),
            stored(2, "b"),
            stored(3, "c"),
            stored(1, "a"),
        ]);

        // then (期待する結果):
        let ids: Vec<Option<u64>> = added.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![Some(1), Some(4)]);
        let all: Vec<&str> = history.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }
}
