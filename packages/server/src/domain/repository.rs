//! Repository trait 定義
//!
//! ドメイン層が必要とするメッセージ履歴へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Message, NewMessage, RepositoryError};

/// 直近メッセージ取得時のデフォルト件数
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Message Repository trait
///
/// メッセージ履歴は追記のみ（append-only）で、既存のメッセージが変更・削除されることはない。
/// ID は挿入順に連番で払い出され、並行した追加でも重複・欠番は発生しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 直近 `limit` 件のメッセージを古い順に取得
    ///
    /// 保存件数が `limit` 未満の場合は全件を返す。
    async fn recent_messages(&self, limit: usize) -> Result<Vec<Message>, RepositoryError>;

    /// メッセージを追加し、ID とタイムスタンプが確定した Message を返す
    async fn add_message(&self, new_message: NewMessage) -> Result<Message, RepositoryError>;

    /// 保存済みメッセージ数を取得
    async fn count(&self) -> usize;
}
