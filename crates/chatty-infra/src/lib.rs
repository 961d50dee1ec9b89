//! Infrastructure layer for Chatty.
//!
//! Contains implementations of the repository traits defined in `chatty-core`
//! (SQLite storage with transient-failure retry) and the configuration loader.

pub mod config;
pub mod sqlite;
