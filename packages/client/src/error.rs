//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured user name cannot be used
    #[error("Invalid user name '{0}'")]
    InvalidUser(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection dropped
    #[error("Connection lost")]
    ConnectionLost,

    /// A REST request failed
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::RequestError(error.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::ConnectionError(error.to_string())
    }
}
