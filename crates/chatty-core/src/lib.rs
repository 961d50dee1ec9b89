//! Chat history store and repository trait definitions for Chatty.
//!
//! This crate defines the "port" (repository trait) that the infrastructure
//! layer implements, plus the store that enforces per-user ordering. It
//! depends only on `chatty-types` -- never on `chatty-infra` or any
//! database/IO crate.

pub mod chat;
