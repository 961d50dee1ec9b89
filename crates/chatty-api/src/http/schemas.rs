//! Request and response bodies, annotated for the OpenAPI document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use chatty_types::chat::ChatMessage;

/// Body of `POST /api/v1/users/{user_id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveMessageRequest {
    /// Message text; must contain something other than whitespace.
    pub content: String,
}

/// A stored chat message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    /// Position in the user's history, starting at 1.
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id.into(),
            content: m.content,
            seq: m.seq,
            created_at: m.created_at,
        }
    }
}

/// A user's full history in its plain-text form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub user_id: String,
    /// One `[timestamp] user_id: content` line per message; empty when there are none.
    pub history: String,
}
