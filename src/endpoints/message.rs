use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, debug_handler};
use tracing::instrument;

use super::ApiResponse;
use crate::models::{Message, MessagePayload};
use crate::service::MessageError;
use crate::state::SharedState;

pub type MessageList = Json<Vec<Message>>;

fn internal_error(error: &sqlx::Error) -> StatusCode {
    tracing::error!(?error, "Database error while serving messages");
    StatusCode::INTERNAL_SERVER_ERROR
}

#[instrument(skip_all, fields(posted_by = ?draft.posted_by))]
#[debug_handler]
pub async fn create(
    State(state): State<SharedState>,
    Json(draft): Json<MessagePayload>,
) -> ApiResponse<Message> {
    match state.messages.create_message(&draft).await {
        Ok(message) => ApiResponse::Body(message),
        Err(MessageError::Database(error)) => ApiResponse::Error(internal_error(&error)),
        Err(_invalid) => ApiResponse::Error(StatusCode::BAD_REQUEST),
    }
}

#[instrument(skip_all, err(Debug))]
#[debug_handler]
pub async fn list(State(state): State<SharedState>) -> Result<MessageList, StatusCode> {
    let messages = state
        .messages
        .all_messages()
        .await
        .inspect(|messages| tracing::debug!(count = messages.len(), "Returning all messages"))
        .map_err(|error| internal_error(&error))?;
    Ok(Json(messages))
}

#[instrument(skip_all, fields(message_id = message_id))]
#[debug_handler]
pub async fn find(
    State(state): State<SharedState>,
    Path(message_id): Path<i64>,
) -> ApiResponse<Message> {
    match state.messages.message_by_id(message_id).await {
        Ok(message) => message.into(),
        Err(error) => ApiResponse::Error(internal_error(&error)),
    }
}

#[instrument(skip_all, fields(message_id = message_id))]
#[debug_handler]
pub async fn delete(
    State(state): State<SharedState>,
    Path(message_id): Path<i64>,
) -> ApiResponse<u64> {
    match state.messages.delete_message(message_id).await {
        Ok(0) => ApiResponse::Empty,
        Ok(_) => ApiResponse::Body(1),
        Err(error) => ApiResponse::Error(internal_error(&error)),
    }
}

#[instrument(skip_all, fields(message_id = message_id))]
#[debug_handler]
pub async fn update(
    State(state): State<SharedState>,
    Path(message_id): Path<i64>,
    Json(patch): Json<MessagePayload>,
) -> ApiResponse<u64> {
    match state.messages.update_message(message_id, &patch).await {
        Ok(_message) => ApiResponse::Body(1),
        Err(MessageError::Database(error)) => ApiResponse::Error(internal_error(&error)),
        Err(_invalid) => ApiResponse::Error(StatusCode::BAD_REQUEST),
    }
}

#[instrument(skip_all, fields(account_id = account_id), err(Debug))]
#[debug_handler]
pub async fn list_by_account(
    State(state): State<SharedState>,
    Path(account_id): Path<i64>,
) -> Result<MessageList, StatusCode> {
    let messages = state
        .messages
        .messages_by_account(account_id)
        .await
        .inspect(|messages| tracing::debug!(count = messages.len(), "Returning account messages"))
        .map_err(|error| internal_error(&error))?;
    Ok(Json(messages))
}
