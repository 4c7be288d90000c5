//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! Vec をインメモリのメッセージ履歴として使用します。プロセス終了時に履歴は失われます。
//!
//! ## 並行性
//!
//! ID の払い出しと履歴への追記は同じロックの内側で行うため、
//! 並行して `add_message` が呼ばれても ID の重複・欠番・順序の逆転は起こりません。

use std::sync::Arc;

use async_trait::async_trait;
use buzz_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    Message, MessageId, MessageRepository, MessageText, NewMessage, RepositoryError, Timestamp,
    UserName,
};

/// デモ用の初期メッセージ（user, message, timestamp）
const SAMPLE_MESSAGES: [(&str, &str, &str); 5] = [
    ("Alice", "Hey team, morning!", "2025-08-06T08:01:00Z"),
    ("Bob", "Morning Alice!", "2025-08-06T08:01:15Z"),
    ("Charlie", "Anyone up for lunch later?", "2025-08-06T08:02:00Z"),
    ("Alice", "Count me in.", "2025-08-06T08:02:10Z"),
    ("Bob", "Same here!", "2025-08-06T08:02:20Z"),
];

/// ロックで保護される履歴本体
#[derive(Debug, Default)]
struct MessageLog {
    /// 最後に払い出した ID（0 は未払い出し）
    last_id: u64,
    messages: Vec<Message>,
}

impl MessageLog {
    fn append(&mut self, new_message: NewMessage, now: String) -> Result<Message, RepositoryError> {
        let next_id = self
            .last_id
            .checked_add(1)
            .ok_or(RepositoryError::IdExhausted)?;

        let message = Message {
            id: MessageId::new(next_id),
            user: new_message.user,
            text: new_message.text,
            timestamp: new_message.timestamp.unwrap_or_else(|| Timestamp::new(now)),
        };

        self.last_id = next_id;
        self.messages.push(message.clone());
        Ok(message)
    }

    fn tail(&self, limit: usize) -> Vec<Message> {
        let start = self.messages.len().saturating_sub(limit);
        self.messages[start..].to_vec()
    }
}

/// インメモリ Message Repository 実装
///
/// 履歴を保持し、ドメイン層の MessageRepository trait を実装します（依存性の逆転）。
pub struct InMemoryMessageRepository {
    log: Mutex<MessageLog>,
    /// タイムスタンプ未指定時に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    /// 空の InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// 時計を指定して空の InMemoryMessageRepository を作成
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: Mutex::new(MessageLog::default()),
            clock,
        }
    }

    /// デモ用の 5 件のメッセージ（ID 1〜5）を登録済みの状態で作成
    ///
    /// 次に払い出される ID は 6 になります。
    pub fn with_sample_messages(clock: Arc<dyn Clock>) -> Result<Self, RepositoryError> {
        let mut log = MessageLog::default();
        for (user, text, timestamp) in SAMPLE_MESSAGES {
            let new_message = NewMessage::new(
                UserName::new(user.to_string())
                    .map_err(|e| RepositoryError::Storage(e.to_string()))?,
                MessageText::new(text.to_string())
                    .map_err(|e| RepositoryError::Storage(e.to_string()))?,
                Some(Timestamp::new(timestamp.to_string())),
            );
            log.append(new_message, clock.now_iso8601())?;
        }

        Ok(Self {
            log: Mutex::new(log),
            clock,
        })
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn recent_messages(&self, limit: usize) -> Result<Vec<Message>, RepositoryError> {
        let log = self.log.lock().await;
        Ok(log.tail(limit))
    }

    async fn add_message(&self, new_message: NewMessage) -> Result<Message, RepositoryError> {
        let now = self.clock.now_iso8601();
        let mut log = self.log.lock().await;
        let message = log.append(new_message, now)?;
        tracing::debug!(
            "Stored message {} from '{}'",
            message.id.value(),
            message.user.as_str()
        );
        Ok(message)
    }

    async fn count(&self) -> usize {
        let log = self.log.lock().await;
        log.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzz_shared::time::FixedClock;
    use std::collections::HashSet;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryMessageRepository の追加・取得
    // - ID の連番払い出し（並行追加を含む）
    // - タイムスタンプのデフォルト値
    //
    // 【なぜこのテストが必要か】
    // - ID の重複・欠番はクライアント側の重複排除を壊す
    // - recent_messages は接続時スナップショットと GET /api/messages の両方で使われる
    //
    // 【どのようなシナリオをテストするか】
    // 1. 空の履歴への追加で ID 1 が払い出される
    // 2. limit より少ない/多い件数での recent_messages
    // 3. 並行追加での ID の一意性と連続性
    // 4. デモ用初期メッセージ
    // ========================================

    fn new_message(user: &str, text: &str) -> NewMessage {
        NewMessage::new(
            UserName::new(user.to_string()).unwrap(),
            MessageText::new(text.to_string()).unwrap(),
            None,
        )
    }

    fn create_test_repository() -> InMemoryMessageRepository {
        // 2023-01-01T00:00:00.000Z
        InMemoryMessageRepository::with_clock(Arc::new(FixedClock::new(1672531200000)))
    }

    #[tokio::test]
    async fn test_add_message_to_empty_store_assigns_first_id() {
        // テスト項目: 空の履歴に追加すると ID 1 とデフォルトのタイムスタンプが付与される
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let message = repo.add_message(new_message("Alice", "hi")).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.id, MessageId::new(1));
        assert_eq!(message.user.as_str(), "Alice");
        assert_eq!(message.text.as_str(), "hi");
        assert_eq!(message.timestamp.as_str(), "2023-01-01T00:00:00.000Z");
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_add_message_keeps_client_timestamp() {
        // テスト項目: クライアント指定のタイムスタンプはそのまま保存される
        // given (前提条件):
        let repo = create_test_repository();
        let mut input = new_message("Bob", "hello");
        input.timestamp = Some(Timestamp::new("2025-08-06T08:01:15Z".to_string()));

        // when (操作):
        let message = repo.add_message(input).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.timestamp.as_str(), "2025-08-06T08:01:15Z");
    }

    #[tokio::test]
    async fn test_recent_messages_returns_all_when_fewer_than_limit() {
        // テスト項目: 保存件数が limit 未満なら全件を古い順で返す
        // given (前提条件):
        let repo = create_test_repository();
        repo.add_message(new_message("Alice", "one")).await.unwrap();
        repo.add_message(new_message("Bob", "two")).await.unwrap();

        // when (操作):
        let messages = repo.recent_messages(5).await.unwrap();

        // then (期待する結果):
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_recent_messages_returns_tail_in_insertion_order() {
        // テスト項目: 保存件数が limit を超える場合は末尾 limit 件を古い順で返す
        // given (前提条件):
        let repo = create_test_repository();
        for i in 1..=8 {
            repo.add_message(new_message("Alice", &format!("message {}", i)))
                .await
                .unwrap();
        }

        // when (操作):
        let messages = repo.recent_messages(5).await.unwrap();

        // then (期待する結果):
        let ids: Vec<u64> = messages.iter().map(|m| m.id.value()).collect();
        assert_eq!(ids, vec![4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_recent_messages_with_zero_limit() {
        // テスト項目: limit が 0 の場合は空のリストを返す
        // given (前提条件):
        let repo = create_test_repository();
        repo.add_message(new_message("Alice", "hi")).await.unwrap();

        // when (操作):
        let messages = repo.recent_messages(0).await.unwrap();

        // then (期待する結果):
        assert!(messages.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_message_assigns_unique_sequential_ids() {
        // テスト項目: 並行して追加しても ID は 1..=n で重複も欠番もない
        // given (前提条件):
        let repo = Arc::new(create_test_repository());
        let n = 200;

        // when (操作):
        let handles: Vec<_> = (0..n)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.add_message(new_message("Alice", &format!("message {}", i)))
                        .await
                        .unwrap()
                        .id
                        .value()
                })
            })
            .collect();

        let mut ids = Vec::with_capacity(n);
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        // then (期待する結果):
        let unique: HashSet<u64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), n);
        assert_eq!(*ids.iter().min().unwrap(), 1);
        assert_eq!(*ids.iter().max().unwrap(), n as u64);

        // 履歴の並びは ID の昇順と一致する
        let stored = repo.recent_messages(n).await.unwrap();
        let stored_ids: Vec<u64> = stored.iter().map(|m| m.id.value()).collect();
        let expected: Vec<u64> = (1..=n as u64).collect();
        assert_eq!(stored_ids, expected);
    }

    #[tokio::test]
    async fn test_sample_messages_seed_history() {
        // テスト項目: デモ用初期メッセージが登録され、次の ID は 6 になる
        // given (前提条件):
        let repo =
            InMemoryMessageRepository::with_sample_messages(Arc::new(FixedClock::new(0))).unwrap();

        // when (操作):
        let seeded = repo.recent_messages(5).await.unwrap();
        let next = repo.add_message(new_message("Alice", "new")).await.unwrap();

        // then (期待する結果):
        assert_eq!(seeded.len(), 5);
        assert_eq!(seeded[0].user.as_str(), "Alice");
        assert_eq!(seeded[0].timestamp.as_str(), "2025-08-06T08:01:00Z");
        assert_eq!(seeded[4].text.as_str(), "Same here!");
        assert_eq!(next.id, MessageId::new(6));
    }
}
