//! Chat history persistence and retrieval.
//!
//! - `repository`: the `ChatRepository` trait the infrastructure layer implements
//! - `store`: `ChatHistoryStore`, which validates input, assigns timestamps and
//!   sequence numbers, and serializes writes per user
//! - `format`: the plain-text history rendering returned by `get_history`

pub mod format;
pub mod repository;
pub mod store;
