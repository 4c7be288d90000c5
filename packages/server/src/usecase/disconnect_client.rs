//! UseCase: クライアント切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続をレジストリから取り除く
    ///
    /// close・エラー・ハートビート失敗のどれが先に起きても呼ばれうるため冪等。
    /// 実際に取り除いた場合は true を返す。
    pub async fn execute(&self, connection_id: ConnectionId) -> bool {
        let removed = self.message_pusher.unregister(connection_id).await;
        if removed {
            tracing::info!("Connection {} removed from registry", connection_id);
        } else {
            tracing::debug!("Connection {} was already removed", connection_id);
        }
        removed
    }
}
