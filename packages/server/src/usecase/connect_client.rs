//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 接続の登録と、新しい接続だけへの初期スナップショット送信
//!
//! ### なぜこのテストが必要か
//! - 新しい接続は直近メッセージを受け取ってから live イベントを受け取る
//! - スナップショットは他の接続に送られてはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録とスナップショット送信
//! - 異常系：接続数上限超過

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ConnectionId, DEFAULT_RECENT_LIMIT, MessagePusher, MessageRepository,
    PusherChannel,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 接続成功（払い出された ConnectionId を返す）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(&self, sender: PusherChannel) -> Result<ConnectionId, ConnectError> {
        // 1. MessagePusher に接続を登録
        let connection_id = self.message_pusher.register(sender).await?;

        // 2. 直近メッセージのスナップショットをこの接続にだけ送信
        //    送信キュー経由なので、以降のブロードキャストより必ず先に届く
        match self.repository.recent_messages(DEFAULT_RECENT_LIMIT).await {
            Ok(messages) => {
                let count = messages.len();
                if let Err(e) = self
                    .message_pusher
                    .push_to(connection_id, &ChatEvent::InitialMessages(messages))
                    .await
                {
                    tracing::warn!(
                        "Failed to push initial messages to connection {}: {}",
                        connection_id,
                        e
                    );
                } else {
                    tracing::info!(
                        "Sent {} initial message(s) to connection {}",
                        count,
                        connection_id
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to load initial messages for connection {}: {}",
                    connection_id,
                    e
                );
            }
        }

        Ok(connection_id)
    }
}
