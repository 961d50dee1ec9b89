//! Chat history HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/users/{user_id}/messages - Save a message
//! - GET  /api/v1/users/{user_id}/messages - Structured message list
//! - GET  /api/v1/users/{user_id}/history  - Plain-text history

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::http::schemas::{HistoryResponse, MessageResponse, SaveMessageRequest};
use crate::state::AppState;

/// POST /api/v1/users/{user_id}/messages - Append a message to the user's history.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/messages",
    tag = "chat",
    params(("user_id" = String, Path, description = "Owner of the chat history")),
    request_body = SaveMessageRequest,
    responses(
        (status = 201, description = "Message stored (inside the envelope `data` field)", body = MessageResponse),
        (status = 400, description = "Empty or oversized message, malformed body, or invalid user id"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn save_message(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<SaveMessageRequest>, JsonRejection>,
) -> Result<ApiResponse<MessageResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let Json(req) = payload?;

    let message = state.chat_store.append(&user_id, &req.content).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(
        ApiResponse::success(MessageResponse::from(message), request_id, elapsed)
            .with_status(StatusCode::CREATED)
            .with_link("history", format!("/api/v1/users/{user_id}/history")),
    )
}

/// GET /api/v1/users/{user_id}/history - The user's history as text.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/history",
    tag = "chat",
    params(("user_id" = String, Path, description = "Owner of the chat history")),
    responses(
        (status = 200, description = "Rendered history (inside the envelope `data` field)", body = HistoryResponse),
        (status = 400, description = "Invalid user id"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<HistoryResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let history = state.chat_store.get_history(&user_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let self_link = format!("/api/v1/users/{user_id}/history");
    let messages_link = format!("/api/v1/users/{user_id}/messages");
    Ok(
        ApiResponse::success(HistoryResponse { user_id, history }, request_id, elapsed)
            .with_link("self", self_link)
            .with_link("messages", messages_link),
    )
}

/// GET /api/v1/users/{user_id}/messages - The user's messages as records.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/messages",
    tag = "chat",
    params(("user_id" = String, Path, description = "Owner of the chat history")),
    responses(
        (status = 200, description = "Messages in history order (inside the envelope `data` field)", body = [MessageResponse]),
        (status = 400, description = "Invalid user id"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<MessageResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let messages: Vec<MessageResponse> = state
        .chat_store
        .messages(&user_id)
        .await?
        .into_iter()
        .map(MessageResponse::from)
        .collect();

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(ApiResponse::success(messages, request_id, elapsed)
        .with_link("self", format!("/api/v1/users/{user_id}/messages")))
}
