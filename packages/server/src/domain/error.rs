//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user name must not be empty")]
    UserNameEmpty,

    #[error("message text must not be empty")]
    MessageTextEmpty,
}

/// Errors reported by a `MessageRepository`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("message id space exhausted")]
    IdExhausted,

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Errors reported by a `MessagePusher`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} not found")]
    ConnectionNotFound(u64),

    #[error("connection limit of {0} reached")]
    CapacityExceeded(usize),

    #[error("failed to serialize event: {0}")]
    Serialization(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
