//! Chat history store: the append and read-back operations behind the API.
//!
//! `ChatHistoryStore` validates input, assigns each message its timestamp
//! and per-user sequence number, and hands it to the `ChatRepository`.
//! Writes for the same user are serialized through a per-user async mutex
//! guarding a write cursor, so concurrent saves can never produce
//! out-of-order sequence numbers or a timestamp earlier than the previous
//! message. Writes for different users never contend.

use std::sync::Arc;

use chatty_types::chat::{ChatMessage, DEFAULT_MAX_MESSAGE_BYTES, NewMessage, UserId};
use chatty_types::error::{ChatError, RepositoryError};
use chrono::{DateTime, SubsecRound, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chat::format;
use crate::chat::repository::ChatRepository;

/// Last position written for a user.
#[derive(Debug, Clone, Copy)]
struct WriteCursor {
    seq: i64,
    created_at: DateTime<Utc>,
}

impl WriteCursor {
    fn empty() -> Self {
        Self {
            seq: 0,
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    fn after(message: &ChatMessage) -> Self {
        Self {
            seq: message.seq,
            created_at: message.created_at,
        }
    }
}

/// `None` until the cursor has been loaded from the repository.
type CursorSlot = Arc<Mutex<Option<WriteCursor>>>;

/// Drops a user's cursor slot from the map once no writer holds it, so the
/// map only tracks users with a write in flight.
struct SlotRelease<'a> {
    cursors: &'a DashMap<UserId, CursorSlot>,
    user_id: UserId,
}

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        self.cursors
            .remove_if(&self.user_id, |_, slot| Arc::strong_count(slot) == 1);
    }
}

/// Build the message that follows `last` in the user's history.
fn next_message(user_id: &UserId, content: &str, last: WriteCursor) -> ChatMessage {
    // Stored timestamps carry microsecond precision.
    let now = Utc::now().trunc_subsecs(6);
    ChatMessage {
        id: Uuid::now_v7(),
        user_id: user_id.clone(),
        content: content.to_string(),
        seq: last.seq + 1,
        created_at: now.max(last.created_at),
    }
}

/// Owns persisted chat messages per user.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (chatty-core never depends on chatty-infra).
pub struct ChatHistoryStore<R: ChatRepository> {
    repo: R,
    cursors: DashMap<UserId, CursorSlot>,
    max_message_bytes: usize,
}

impl<R: ChatRepository> ChatHistoryStore<R> {
    /// Create a store over the given repository with the default message size cap.
    pub fn new(repo: R) -> Self {
        Self::with_max_message_bytes(repo, DEFAULT_MAX_MESSAGE_BYTES)
    }

    pub fn with_max_message_bytes(repo: R, max_message_bytes: usize) -> Self {
        Self {
            repo,
            cursors: DashMap::new(),
            max_message_bytes,
        }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // --- Writes ---

    /// Save a message, reporting only success or failure.
    ///
    /// Never returns an error: invalid input and storage failures both yield
    /// `false` and are logged.
    pub async fn save_message(&self, user_id: &str, message: &str) -> bool {
        match self.append(user_id, message).await {
            Ok(_) => true,
            Err(e) if e.is_validation() => {
                warn!(user_id, error = %e, "Rejected chat message");
                false
            }
            Err(e) => {
                warn!(user_id, error = %e, "Failed to save chat message");
                false
            }
        }
    }

    /// Append a message to the user's history and return the stored record.
    ///
    /// Nothing is written when validation fails.
    pub async fn append(&self, user_id: &str, content: &str) -> Result<ChatMessage, ChatError> {
        let user_id = UserId::parse(user_id)?;
        let content = NewMessage::parse(content, self.max_message_bytes)?.into_inner();

        // Declared first so it drops last, after the guard and the slot below.
        let _release = SlotRelease {
            cursors: &self.cursors,
            user_id: user_id.clone(),
        };
        // Clone the slot out so the map shard is not locked across awaits.
        let slot = Arc::clone(self.cursors.entry(user_id.clone()).or_default().value());
        let mut cursor = slot.lock().await;

        // Taken, not copied: if this future is dropped mid-write the next
        // writer reloads from storage instead of trusting a stale position.
        let last = match cursor.take() {
            Some(last) => last,
            None => self.load_cursor(&user_id).await?,
        };

        let message = next_message(&user_id, &content, last);
        let message = match self.repo.append(&message).await {
            Ok(()) => message,
            Err(RepositoryError::Conflict(reason)) => {
                // The stored history moved past our cursor; resync once.
                debug!(user_id = %user_id, seq = message.seq, %reason, "Write cursor was stale, reloading");
                let last = self.load_cursor(&user_id).await?;
                let message = next_message(&user_id, &content, last);
                self.repo.append(&message).await?;
                message
            }
            Err(e) => {
                *cursor = Some(last);
                return Err(e.into());
            }
        };

        *cursor = Some(WriteCursor::after(&message));
        info!(user_id = %message.user_id, seq = message.seq, "Chat message saved");
        Ok(message)
    }

    async fn load_cursor(&self, user_id: &UserId) -> Result<WriteCursor, ChatError> {
        let cursor = match self.repo.latest(user_id).await? {
            Some(message) => WriteCursor::after(&message),
            None => WriteCursor::empty(),
        };
        debug!(user_id = %user_id, seq = cursor.seq, "Loaded write cursor");
        Ok(cursor)
    }

    // --- Reads ---

    /// All messages for a user in history order.
    pub async fn messages(&self, user_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        let user_id = UserId::parse(user_id)?;
        let messages = self.repo.read_all(&user_id).await?;
        debug!(user_id = %user_id, count = messages.len(), "Loaded chat history");
        Ok(messages)
    }

    /// The user's full history rendered as text (see [`format`]).
    ///
    /// A user with no messages gets the empty string.
    pub async fn get_history(&self, user_id: &str) -> Result<String, ChatError> {
        let messages = self.messages(user_id).await?;
        Ok(format::render_history(&messages))
    }
}
