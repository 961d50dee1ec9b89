//! Chat message and user identity types for Chatty.
//!
//! A user's chat history is the ordered sequence of [`ChatMessage`]s stored
//! under their [`UserId`]. Messages are immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

/// Longest accepted user identifier, in bytes.
pub const MAX_USER_ID_BYTES: usize = 128;

/// Default cap on a single message body, in bytes.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 32 * 1024;

/// Opaque identifier of the user owning a chat history.
///
/// Must be non-empty, free of surrounding whitespace and control characters,
/// and at most [`MAX_USER_ID_BYTES`] long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a raw user identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ChatError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ChatError::InvalidUserId("user id must not be empty".to_string()));
        }
        if raw.trim() != raw {
            return Err(ChatError::InvalidUserId(
                "user id must not have leading or trailing whitespace".to_string(),
            ));
        }
        if raw.len() > MAX_USER_ID_BYTES {
            return Err(ChatError::InvalidUserId(format!(
                "user id is {} bytes, maximum is {MAX_USER_ID_BYTES}",
                raw.len()
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(ChatError::InvalidUserId(
                "user id must not contain control characters".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = ChatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Validated body of a message about to be saved.
///
/// The text is kept exactly as submitted; only its trimmed form is checked
/// for emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage(String);

impl NewMessage {
    /// Validate message content against the configured size cap.
    pub fn parse(content: impl Into<String>, max_bytes: usize) -> Result<Self, ChatError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ChatError::InvalidMessage("message must not be empty".to_string()));
        }
        if content.len() > max_bytes {
            return Err(ChatError::InvalidMessage(format!(
                "message is {} bytes, maximum is {max_bytes}",
                content.len()
            )));
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A single stored message within a user's chat history.
///
/// Messages are ordered by `created_at`, then by `seq` for equal timestamps.
/// Both are assigned by the store at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: UserId,
    pub content: String,
    /// Per-user insertion counter, starting at 1.
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}
