//! Auto-expiry of typing indicators.
//!
//! A client that starts typing and then goes silent (crash, lost network)
//! must not leave a stale "is typing" indicator on its peers. Every relayed
//! typing-start arms a one-shot timer; when it fires and the originating
//! connection is still registered, a synthesized `isTyping: false` is relayed
//! to every other connection.
//!
//! Pending timers are keyed by `(connection, user)`. A newer typing event for
//! the same key supersedes the pending one, so a burst of typing-starts yields
//! a single stop, one timeout after the last start. Closing the connection
//! does not cancel the timer: the registry check at fire time does.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::domain::{ChatEvent, ConnectionId, MessagePusher, TypingSignal, UserName};

/// Delay between a relayed typing-start and the synthesized stop
pub const DEFAULT_TYPING_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Default)]
struct PendingExpiries {
    last_token: u64,
    pending: HashMap<(ConnectionId, UserName), u64>,
}

pub struct TypingExpiry {
    message_pusher: Arc<dyn MessagePusher>,
    timeout: Duration,
    state: Arc<Mutex<PendingExpiries>>,
}

impl TypingExpiry {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, timeout: Duration) -> Self {
        Self {
            message_pusher,
            timeout,
            state: Arc::new(Mutex::new(PendingExpiries::default())),
        }
    }

    /// Arm (or re-arm) the expiry for `user` typing on `sender`.
    ///
    /// The returned handle resolves to `true` if a stop was relayed.
    pub async fn arm(&self, sender: ConnectionId, user: UserName) -> JoinHandle<bool> {
        let key = (sender, user);
        let token = {
            let mut state = self.state.lock().await;
            state.last_token += 1;
            let token = state.last_token;
            state.pending.insert(key.clone(), token);
            token
        };

        let message_pusher = self.message_pusher.clone();
        let state = self.state.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;

            {
                let mut state = state.lock().await;
                if state.pending.get(&key) != Some(&token) {
                    return false;
                }
                state.pending.remove(&key);
            }

            let (sender, user) = key;
            if !message_pusher.is_connected(sender).await {
                tracing::debug!(
                    "Typing expiry for '{}' dropped: connection {} is closed",
                    user.as_str(),
                    sender
                );
                return false;
            }

            let event = ChatEvent::Typing(TypingSignal::stopped(user.clone()));
            match message_pusher.broadcast_to_others(sender, &event).await {
                Ok(delivered) => {
                    tracing::debug!(
                        "Typing expired for '{}' on connection {}, notified {} peer(s)",
                        user.as_str(),
                        sender,
                        delivered
                    );
                    true
                }
                Err(e) => {
                    tracing::warn!("Failed to relay typing expiry for '{}': {}", user.as_str(), e);
                    false
                }
            }
        })
    }

    /// Drop any pending expiry for `user` on `sender`.
    pub async fn settle(&self, sender: ConnectionId, user: &UserName) {
        let mut state = self.state.lock().await;
        state.pending.retain(|(id, name), _| !(*id == sender && name == user));
    }

    /// Number of timers that have not fired or been superseded yet
    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use tokio::{sync::mpsc, time::Instant};

    const STOP_FRAME: &str = r#"{"type":"typing","data":{"user":"Alice","isTyping":false}}"#;

    fn alice() -> UserName {
        UserName::new("Alice".to_string()).unwrap()
    }

    struct Fixture {
        pusher: Arc<WebSocketMessagePusher>,
        expiry: TypingExpiry,
        sender: ConnectionId,
        sender_rx: mpsc::UnboundedReceiver<String>,
        peer_rx: mpsc::UnboundedReceiver<String>,
    }

    async fn fixture() -> Fixture {
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (sender_tx, sender_rx) = mpsc::unbounded_channel();
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        let sender = pusher.register(sender_tx).await.unwrap();
        pusher.register(peer_tx).await.unwrap();
        let expiry = TypingExpiry::new(pusher.clone(), DEFAULT_TYPING_TIMEOUT);
        Fixture {
            pusher,
            expiry,
            sender,
            sender_rx,
            peer_rx,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_start_expires_after_timeout() {
        // テスト項目: typing 開始から 3000ms 後に送信者以外へ停止イベントが送られる
        // given (前提条件):
        let mut f = fixture().await;
        let started = Instant::now();

        // when (操作):
        let handle = f.expiry.arm(f.sender, alice()).await;
        let relayed = handle.await.unwrap();

        // then (期待する結果):
        assert!(relayed);
        assert!(started.elapsed() >= Duration::from_millis(3000));
        assert_eq!(f.peer_rx.recv().await, Some(STOP_FRAME.to_string()));
        assert!(f.sender_rx.try_recv().is_err());
        assert_eq!(f.expiry.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_expiry_is_dropped_when_sender_closed() {
        // テスト項目: 発火時に送信者の接続が閉じていれば何も送られない
        // given (前提条件):
        let mut f = fixture().await;
        let handle = f.expiry.arm(f.sender, alice()).await;

        // when (操作):
        f.pusher.unregister(f.sender).await;
        let relayed = handle.await.unwrap();

        // then (期待する結果):
        assert!(!relayed);
        assert!(f.peer_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_typing_starts_are_coalesced() {
        // テスト項目: 連続した typing 開始は最後の開始から 3000ms 後の 1 回の停止にまとめられる
        // given (前提条件):
        let mut f = fixture().await;
        let started = Instant::now();
        let first = f.expiry.arm(f.sender, alice()).await;

        // when (操作):
        tokio::time::advance(Duration::from_millis(1000)).await;
        let second = f.expiry.arm(f.sender, alice()).await;

        // then (期待する結果):
        assert!(!first.await.unwrap());
        assert!(second.await.unwrap());
        assert!(started.elapsed() >= Duration::from_millis(4000));
        assert_eq!(f.peer_rx.recv().await, Some(STOP_FRAME.to_string()));
        assert!(f.peer_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_cancels_pending_expiry() {
        // テスト項目: typing 停止を受け取った後は自動停止が送られない
        // given (前提条件):
        let mut f = fixture().await;
        let handle = f.expiry.arm(f.sender, alice()).await;

        // when (操作):
        f.expiry.settle(f.sender, &alice()).await;

        // then (期待する結果):
        assert!(!handle.await.unwrap());
        assert!(f.peer_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiries_for_different_users_are_independent() {
        // テスト項目: 異なるユーザーの自動停止は互いに影響しない
        // given (前提条件):
        let mut f = fixture().await;
        let bob = UserName::new("Bob".to_string()).unwrap();

        // when (操作):
        let alice_handle = f.expiry.arm(f.sender, alice()).await;
        let bob_handle = f.expiry.arm(f.sender, bob).await;

        // then (期待する結果):
        assert!(alice_handle.await.unwrap());
        assert!(bob_handle.await.unwrap());
        let mut frames = vec![
            f.peer_rx.recv().await.unwrap(),
            f.peer_rx.recv().await.unwrap(),
        ];
        frames.sort();
        assert_eq!(
            frames,
            vec![
                STOP_FRAME.to_string(),
                r#"{"type":"typing","data":{"user":"Bob","isTyping":false}}"#.to_string(),
            ]
        );
    }
}
