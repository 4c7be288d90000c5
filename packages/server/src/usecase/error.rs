//! UseCase error types.

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError};

/// Errors returned by `GetRecentMessagesUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessagesError {
    #[error("failed to load messages: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors returned by `PostMessageUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostMessageError {
    #[error("failed to store message: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors returned by `ConnectClientUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection limit of {0} reached")]
    CapacityExceeded(usize),

    #[error("failed to register connection: {0}")]
    Registry(MessagePushError),
}

impl From<MessagePushError> for ConnectError {
    fn from(error: MessagePushError) -> Self {
        match error {
            MessagePushError::CapacityExceeded(max) => ConnectError::CapacityExceeded(max),
            other => ConnectError::Registry(other),
        }
    }
}
