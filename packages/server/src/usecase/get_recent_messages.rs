//! UseCase: 直近メッセージ取得処理

use std::sync::Arc;

use crate::domain::{Message, MessageRepository};

use super::error::GetMessagesError;

/// 直近メッセージ取得のユースケース
pub struct GetRecentMessagesUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
}

impl GetRecentMessagesUseCase {
    /// 新しい GetRecentMessagesUseCase を作成
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    /// 直近 `limit` 件のメッセージを古い順に取得
    pub async fn execute(&self, limit: usize) -> Result<Vec<Message>, GetMessagesError> {
        Ok(self.repository.recent_messages(limit).await?)
    }
}
