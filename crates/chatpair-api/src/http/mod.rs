//! HTTP/REST API layer for chatpair.
//!
//! Axum-based JSON API under `/api/` with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
