//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::ErrorResponse,
    usecase::{GetMessagesError, PostMessageError},
};

/// Error returned by the REST handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn invalid_message_data() -> Self {
        Self::bad_request("Invalid message data")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GetMessagesError> for ApiError {
    fn from(err: GetMessagesError) -> Self {
        tracing::error!(?err, "failed to fetch messages");
        Self::internal("Failed to fetch messages")
    }
}

impl From<PostMessageError> for ApiError {
    fn from(err: PostMessageError) -> Self {
        tracing::error!(?err, "failed to save message");
        Self::internal("Failed to save message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryError;

    #[test]
    fn test_repository_failure_maps_to_internal_error() {
        // テスト項目: ストア障害は 500 と汎用メッセージに変換される
        // given (前提条件):
        let err = GetMessagesError::Repository(RepositoryError::Storage("poisoned".to_string()));

        // when (操作):
        let api_error = ApiError::from(err);

        // then (期待する結果):
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Failed to fetch messages");
    }

    #[test]
    fn test_invalid_message_data_is_bad_request() {
        // テスト項目: 不正な入力は 400 "Invalid message data" になる
        // given (前提条件):

        // when (操作):
        let response = ApiError::invalid_message_data().into_response();

        // then (期待する結果):
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
