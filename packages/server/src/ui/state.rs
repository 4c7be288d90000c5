//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetRecentMessagesUseCase, PostMessageUseCase,
    RelayEventUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetRecentMessagesUseCase（直近メッセージ取得のユースケース）
    pub get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    /// PostMessageUseCase（メッセージ投稿のユースケース）
    pub post_message_usecase: Arc<PostMessageUseCase>,
    /// RelayEventUseCase（ストリームイベント中継のユースケース）
    pub relay_event_usecase: Arc<RelayEventUseCase>,
    /// WebSocket の死活確認間隔
    pub heartbeat_interval: Duration,
}
