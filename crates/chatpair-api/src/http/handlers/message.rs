//! Message CRUD and regeneration handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use chatpair_types::message::{CreateMessageRequest, Message, MessageId, UpdateMessageRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/messages - List all messages in chronological order.
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.message_service.list().await?;
    Ok(Json(messages))
}

/// POST /api/messages - Create a message. User messages get a bot reply.
pub async fn create_message(
    State(state): State<AppState>,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let Json(req) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let message = state
        .message_service
        .create(&req.content, req.sender, req.parent_message_id)
        .await?;

    Ok(Json(message))
}

/// PUT /api/messages/{id} - Edit a user message and regenerate its reply.
pub async fn update_message(
    State(state): State<AppState>,
    id: Result<Path<MessageId>, PathRejection>,
    body: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let Path(id) = id.map_err(|e| AppError::Validation(e.body_text()))?;
    let Json(req) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let message = state.message_service.update(id, &req.content).await?;
    Ok(Json(message))
}

/// DELETE /api/messages/{id} - Delete a user message and its reply.
pub async fn delete_message(
    State(state): State<AppState>,
    id: Result<Path<MessageId>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id.map_err(|e| AppError::Validation(e.body_text()))?;

    state.message_service.delete(id).await?;
    Ok(Json(json!({ "message": "Message deleted successfully" })))
}

/// POST /api/messages/regenerate/{id} - Regenerate a reply from its parent.
pub async fn regenerate_message(
    State(state): State<AppState>,
    id: Result<Path<MessageId>, PathRejection>,
) -> Result<Json<Message>, AppError> {
    let Path(id) = id.map_err(|e| AppError::Validation(e.body_text()))?;

    let message = state.message_service.regenerate(id).await?;
    Ok(Json(message))
}
