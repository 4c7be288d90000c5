//! UseCase: ストリームイベント中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayEventUseCase::execute() メソッド
//! - 検証済みイベントの送信者以外への中継と、typing 自動停止の登録
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にイベントがエコーされてはならない
//! - typing 開始だけが自動停止タイマーを登録する
//!
//! ### どのような状況を想定しているか
//! - 正常系：message / typing イベントの中継
//! - エッジケース：他に接続がない場合（中継先なし）

use std::sync::Arc;

use crate::domain::{ChatEvent, ConnectionId, MessagePushError, MessagePusher};

use super::typing_expiry::TypingExpiry;

/// ストリームイベント中継のユースケース
pub struct RelayEventUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// typing 自動停止
    typing_expiry: Arc<TypingExpiry>,
}

impl RelayEventUseCase {
    /// 新しい RelayEventUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, typing_expiry: Arc<TypingExpiry>) -> Self {
        Self {
            message_pusher,
            typing_expiry,
        }
    }

    /// イベント中継を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - イベントを送ってきた接続
    /// * `event` - 検証済みのイベント（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 中継できた接続数
    /// * `Err(MessagePushError)` - シリアライズ失敗
    pub async fn execute(
        &self,
        sender: ConnectionId,
        event: ChatEvent,
    ) -> Result<usize, MessagePushError> {
        // 1. 送信者以外の全接続に中継
        let delivered = self
            .message_pusher
            .broadcast_to_others(sender, &event)
            .await?;

        // 2. typing イベントなら自動停止を登録・解除
        if let ChatEvent::Typing(signal) = event {
            if signal.is_typing {
                self.typing_expiry.arm(sender, signal.user).await;
            } else {
                self.typing_expiry.settle(sender, &signal.user).await;
            }
        }

        Ok(delivered)
    }
}
