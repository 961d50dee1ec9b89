//! Shared domain types for Chatty.
//!
//! This crate contains the core domain types used across the Chatty service:
//! chat messages, user identifiers, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
