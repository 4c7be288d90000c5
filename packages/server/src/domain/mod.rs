//! Domain layer: entities, value objects and the ports implemented by infrastructure.

pub mod entity;
pub mod error;
pub mod event;
pub mod pusher;
pub mod repository;
pub mod validation;
pub mod value_object;

pub use entity::{Message, NewMessage};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::{ChatEvent, TypingSignal};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{DEFAULT_RECENT_LIMIT, MessageRepository};
pub use value_object::{ConnectionId, MessageId, MessageText, Timestamp, UserName};

#[cfg(test)]
pub use pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::MockMessageRepository;
