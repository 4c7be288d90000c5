//! UseCase layer: one struct per operation exposed by the gateway.

pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod get_recent_messages;
pub mod post_message;
pub mod relay_event;
pub mod typing_expiry;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, GetMessagesError, PostMessageError};
pub use get_recent_messages::GetRecentMessagesUseCase;
pub use post_message::PostMessageUseCase;
pub use relay_event::RelayEventUseCase;
pub use typing_expiry::{DEFAULT_TYPING_TIMEOUT, TypingExpiry};
