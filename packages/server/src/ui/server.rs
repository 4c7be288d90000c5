//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRecentMessagesUseCase,
        PostMessageUseCase, RelayEventUseCase,
    },
};

use super::{
    handler::{get_messages, health_check, post_message, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the gateway router on top of the shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/messages", get(get_messages).post(post_message))
        .route("/messages", get(get_messages).post(post_message))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Realtime chat server
///
/// This struct encapsulates the UseCases and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     disconnect_client_usecase,
///     get_recent_messages_usecase,
///     post_message_usecase,
///     relay_event_usecase,
/// );
/// server.run(&ServerConfig::default()).await?;
/// ```
pub struct Server {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetRecentMessagesUseCase（直近メッセージ取得のユースケース）
    get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    /// PostMessageUseCase（メッセージ投稿のユースケース）
    post_message_usecase: Arc<PostMessageUseCase>,
    /// RelayEventUseCase（ストリームイベント中継のユースケース）
    relay_event_usecase: Arc<RelayEventUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
        post_message_usecase: Arc<PostMessageUseCase>,
        relay_event_usecase: Arc<RelayEventUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            disconnect_client_usecase,
            get_recent_messages_usecase,
            post_message_usecase,
            relay_event_usecase,
        }
    }

    /// Run the chat server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            get_recent_messages_usecase: self.get_recent_messages_usecase,
            post_message_usecase: self.post_message_usecase,
            relay_event_usecase: self.relay_event_usecase,
            heartbeat_interval: config.heartbeat_interval,
        });
        let app = router(app_state);

        // Bind the server to the host and port
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
