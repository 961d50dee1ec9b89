//! ChatRepository trait definition.
//!
//! Append-only, per-user ordered message log. There is no
//! update or delete: stored messages are immutable.

use chatty_types::chat::{ChatMessage, UserId};
use chatty_types::error::RepositoryError;

/// Repository trait for chat message persistence.
///
/// Implementations live in chatty-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Durably append a message to its user's history.
    ///
    /// Returns `RepositoryError::Conflict` if `(user_id, seq)` is already taken.
    fn append(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All messages for a user, ordered by `created_at` ASC then `seq` ASC.
    fn read_all(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The message with the highest `seq` for a user, if any.
    fn latest(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;

    /// Count stored messages across all users.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count distinct users with at least one message.
    fn count_users(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
