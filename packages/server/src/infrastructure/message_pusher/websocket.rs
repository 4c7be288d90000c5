//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続レジストリ: 接続ごとの `UnboundedSender` と `ConnectionId` の管理
//! - ブロードキャスト: イベントを一度だけシリアライズし、各接続の送信キューに積む
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 実際のソケットへの書き込みは接続ごとの writer タスクが行うため、
//! 遅い接続が他の接続への配信を妨げることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ChatEvent, ConnectionId, MessagePushError, MessagePusher, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// レジストリ本体
#[derive(Default)]
struct ConnectionTable {
    /// 最後に払い出した ConnectionId
    last_id: u64,
    senders: HashMap<ConnectionId, PusherChannel>,
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::with_max_connections(100);
/// let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
/// let connection_id = pusher.register(tx).await?;
///
/// pusher.broadcast_to_others(connection_id, &event).await?;
/// ```
pub struct WebSocketMessagePusher {
    connections: Mutex<ConnectionTable>,
    /// 同時接続数の上限（None は無制限）
    max_connections: Option<usize>,
}

impl WebSocketMessagePusher {
    /// 接続数の上限なしで作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(ConnectionTable::default()),
            max_connections: None,
        }
    }

    /// 接続数の上限を指定して作成
    pub fn with_max_connections(max_connections: usize) -> Self {
        Self {
            connections: Mutex::new(ConnectionTable::default()),
            max_connections: Some(max_connections),
        }
    }

    fn serialize(event: &ChatEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))
    }

    /// `exclude` 以外の書き込み可能な接続に送信し、送信できた数を返す
    async fn fan_out(&self, content: &str, exclude: Option<ConnectionId>) -> usize {
        let connections = self.connections.lock().await;
        let mut delivered = 0;

        for (id, sender) in connections.senders.iter() {
            if Some(*id) == exclude {
                continue;
            }
            // 閉じかけの接続は close ハンドラが登録解除するので、ここではスキップのみ
            if sender.is_closed() {
                tracing::debug!("Skipping closed connection {}", id);
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!("Failed to push message to connection {}: {}", id, e);
            } else {
                delivered += 1;
            }
        }

        delivered
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, sender: PusherChannel) -> Result<ConnectionId, MessagePushError> {
        let mut connections = self.connections.lock().await;

        if let Some(max) = self.max_connections
            && connections.senders.len() >= max
        {
            return Err(MessagePushError::CapacityExceeded(max));
        }

        connections.last_id += 1;
        let id = ConnectionId::new(connections.last_id);
        connections.senders.insert(id, sender);
        tracing::debug!(
            "Connection {} registered ({} live)",
            id,
            connections.senders.len()
        );
        Ok(id)
    }

    async fn unregister(&self, connection_id: ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.senders.remove(&connection_id).is_some();
        if removed {
            tracing::debug!(
                "Connection {} unregistered ({} live)",
                connection_id,
                connections.senders.len()
            );
        }
        removed
    }

    async fn is_connected(&self, connection_id: ConnectionId) -> bool {
        let connections = self.connections.lock().await;
        connections.senders.contains_key(&connection_id)
    }

    async fn connection_count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.senders.len()
    }

    async fn push_to(
        &self,
        connection_id: ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::serialize(event)?;
        let connections = self.connections.lock().await;

        let sender = connections
            .senders
            .get(&connection_id)
            .ok_or(MessagePushError::ConnectionNotFound(connection_id.value()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed event to connection {}", connection_id);
        Ok(())
    }

    async fn broadcast_to_all(&self, event: &ChatEvent) -> Result<usize, MessagePushError> {
        let content = Self::serialize(event)?;
        Ok(self.fan_out(&content, None).await)
    }

    async fn broadcast_to_others(
        &self,
        sender: ConnectionId,
        event: &ChatEvent,
    ) -> Result<usize, MessagePushError> {
        let content = Self::serialize(event)?;
        Ok(self.fan_out(&content, Some(sender)).await)
    }
}
