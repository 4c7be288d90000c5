//! MessagePusher trait 定義
//!
//! 接続レジストリとブロードキャストのインターフェース。
//! 接続はレジストリが払い出す `ConnectionId` で識別され、送信者除外の判定もこの ID で行う。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatEvent, ConnectionId, MessagePushError};

/// 接続ごとの送信キュー（シリアライズ済み JSON を流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 配信はベストエフォート: 確認応答・再送はなく、閉じかけの接続は黙ってスキップされる。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録し、新しい ConnectionId を払い出す
    async fn register(&self, sender: PusherChannel) -> Result<ConnectionId, MessagePushError>;

    /// 接続を登録解除（冪等）。実際に削除した場合は true
    async fn unregister(&self, connection_id: ConnectionId) -> bool;

    /// 接続がまだ登録されているか
    async fn is_connected(&self, connection_id: ConnectionId) -> bool;

    /// 登録中の接続数
    async fn connection_count(&self) -> usize;

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError>;

    /// 全接続にイベントを送信し、送信できた接続数を返す
    async fn broadcast_to_all(&self, event: &ChatEvent) -> Result<usize, MessagePushError>;

    /// 送信者以外の全接続にイベントを送信し、送信できた接続数を返す
    async fn broadcast_to_others(
        &self,
        sender: ConnectionId,
        event: &ChatEvent,
    ) -> Result<usize, MessagePushError>;
}
