//! Shared domain types for chatpair.
//!
//! This crate contains the message model exchanged by every layer, the
//! request bodies accepted by the API, configuration types, and the error
//! enums the service and repositories report.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
