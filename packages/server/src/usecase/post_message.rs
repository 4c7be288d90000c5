//! UseCase: メッセージ投稿処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - メッセージの保存と全接続へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - REST で投稿されたメッセージは送信者を含む全接続に届く必要がある
//! - 保存に失敗したメッセージはブロードキャストされてはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：保存とブロードキャスト
//! - 異常系：保存失敗
//! - エッジケース：ブロードキャスト失敗でも保存済みメッセージは返す

use std::sync::Arc;

use crate::domain::{ChatEvent, Message, MessagePusher, MessageRepository, NewMessage};

use super::error::PostMessageError;

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ投稿を実行
    ///
    /// # Arguments
    ///
    /// * `new_message` - 検証済みのメッセージ（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - ID とタイムスタンプが確定した保存済みメッセージ
    /// * `Err(PostMessageError)` - 保存失敗
    pub async fn execute(&self, new_message: NewMessage) -> Result<Message, PostMessageError> {
        // 1. Repository 経由でメッセージを保存
        let message = self.repository.add_message(new_message).await?;

        // 2. 送信者を含む全接続にブロードキャスト
        match self
            .message_pusher
            .broadcast_to_all(&ChatEvent::MessageCreated(message.clone()))
            .await
        {
            Ok(delivered) => {
                tracing::info!(
                    "Broadcasted message {} from '{}' to {} connection(s)",
                    message.id.value(),
                    message.user.as_str(),
                    delivered
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to broadcast message {}: {}",
                    message.id.value(),
                    e
                );
            }
        }

        Ok(message)
    }
}
