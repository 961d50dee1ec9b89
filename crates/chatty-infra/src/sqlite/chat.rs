//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `chatty-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct for mapping, and
//! every query wrapped in the pool's retry policy.

use chatty_core::chat::repository::ChatRepository;
use chatty_types::chat::{ChatMessage, UserId};
use chatty_types::error::RepositoryError;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: String,
    user_id: String,
    seq: i64,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            seq: row.try_get("seq")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let user_id = UserId::parse(self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatMessage {
            id,
            user_id,
            content: self.content,
            seq: self.seq,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width so that string order matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection(err.to_string())
        }
        _ => RepositoryError::Query(err.to_string()),
    }
}

fn rows_to_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let msg_row =
            ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        messages.push(msg_row.into_message()?);
    }
    Ok(messages)
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn append(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        let id = message.id.to_string();
        let created_at = format_datetime(&message.created_at);

        self.pool
            .retry
            .run("append message", || {
                // A resend of a row that already committed is a no-op.
                sqlx::query(
                    r#"INSERT INTO chat_messages (id, user_id, seq, content, created_at)
                       VALUES (?, ?, ?, ?, ?)
                       ON CONFLICT(id) DO NOTHING"#,
                )
                .bind(&id)
                .bind(message.user_id.as_str())
                .bind(message.seq)
                .bind(&message.content)
                .bind(&created_at)
                .execute(&self.pool.writer)
            })
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn read_all(&self, user_id: &UserId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = self
            .pool
            .retry
            .run("read history", || {
                sqlx::query(
                    "SELECT * FROM chat_messages WHERE user_id = ? ORDER BY created_at ASC, seq ASC",
                )
                .bind(user_id.as_str())
                .fetch_all(&self.pool.reader)
            })
            .await
            .map_err(map_sqlx_error)?;

        rows_to_messages(&rows)
    }

    async fn latest(&self, user_id: &UserId) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = self
            .pool
            .retry
            .run("read latest message", || {
                sqlx::query("SELECT * FROM chat_messages WHERE user_id = ? ORDER BY seq DESC LIMIT 1")
                    .bind(user_id.as_str())
                    .fetch_optional(&self.pool.reader)
            })
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let msg_row = ChatMessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(msg_row.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        let row = self
            .pool
            .retry
            .run("count messages", || {
                sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages").fetch_one(&self.pool.reader)
            })
            .await
            .map_err(map_sqlx_error)?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    async fn count_users(&self) -> Result<u64, RepositoryError> {
        let row = self
            .pool
            .retry
            .run("count users", || {
                sqlx::query("SELECT COUNT(DISTINCT user_id) as cnt FROM chat_messages")
                    .fetch_one(&self.pool.reader)
            })
            .await
            .map_err(map_sqlx_error)?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
