//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode, split
//! read/write connection pools, and retry of transient failures.

pub mod chat;
pub mod pool;
pub mod retry;
