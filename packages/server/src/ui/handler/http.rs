//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;

use crate::{
    domain::{DEFAULT_RECENT_LIMIT, NewMessage, validation::validate_message},
    infrastructure::dto::http::{CreateMessageRequest, MessageResponse},
    ui::{error::ApiError, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the most recent messages, oldest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let messages = state
        .get_recent_messages_usecase
        .execute(DEFAULT_RECENT_LIMIT)
        .await?;

    // Domain Model から DTO への変換
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Store a message and broadcast it to every connected client
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!("Rejected message body: {}", rejection.body_text());
        ApiError::invalid_message_data()
    })?;

    if !validate_message(&body) {
        tracing::warn!("Invalid message data: {}", body);
        return Err(ApiError::invalid_message_data());
    }

    // JSON -> DTO -> Domain Model
    let request: CreateMessageRequest =
        serde_json::from_value(body).map_err(|_| ApiError::invalid_message_data())?;
    let new_message =
        NewMessage::try_from(request).map_err(|_| ApiError::invalid_message_data())?;

    let message = state.post_message_usecase.execute(new_message).await?;
    tracing::info!("Stored message #{} from '{}'", message.id.value(), message.user.as_str());

    Ok(Json(MessageResponse::from(message)))
}
