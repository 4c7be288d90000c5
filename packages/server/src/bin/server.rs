//! Realtime chat server.
//!
//! Serves the REST message API and the `/ws` event stream.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin buzz-server
//! cargo run --bin buzz-server -- --host 127.0.0.1 --port 3000
//! PORT=8080 SEED_SAMPLE_MESSAGES=true cargo run --bin buzz-server
//! ```

use std::sync::Arc;

use buzz_server::{
    config::{ServerArgs, ServerConfig},
    domain::MessageRepository,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryMessageRepository,
    },
    ui::Server,
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRecentMessagesUseCase,
        PostMessageUseCase, RelayEventUseCase, TypingExpiry,
    },
};
use buzz_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(ServerArgs::parse());

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory message store)
    let clock = Arc::new(SystemClock);
    let repository = if config.seed_sample_messages {
        match InMemoryMessageRepository::with_sample_messages(clock) {
            Ok(repository) => Arc::new(repository),
            Err(e) => {
                tracing::error!("Failed to seed sample messages: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Arc::new(InMemoryMessageRepository::with_clock(clock))
    };
    tracing::info!("Message store ready with {} messages", repository.count().await);

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::with_max_connections(
        config.max_connections,
    ));

    // 3. Create UseCases
    let typing_expiry = Arc::new(TypingExpiry::new(
        message_pusher.clone(),
        config.typing_timeout,
    ));
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(message_pusher.clone()));
    let get_recent_messages_usecase = Arc::new(GetRecentMessagesUseCase::new(repository.clone()));
    let post_message_usecase = Arc::new(PostMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let relay_event_usecase = Arc::new(RelayEventUseCase::new(
        message_pusher.clone(),
        typing_expiry,
    ));

    // 4. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        get_recent_messages_usecase,
        post_message_usecase,
        relay_event_usecase,
    );
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
