use thiserror::Error;

/// Errors from repository operations (used by trait definitions in chatty-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to chat history operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl ChatError {
    /// Whether the error was caused by caller input rather than the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, ChatError::InvalidUserId(_) | ChatError::InvalidMessage(_))
    }
}
