//! HTTP/REST API layer for Chatty.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format, CORS,
//! request tracing, and optional Swagger UI.

pub mod doc;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod schemas;
