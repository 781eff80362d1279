//! Business logic and storage trait definitions for chatpair.
//!
//! This crate defines the "ports" (store and response-generator traits) that
//! the infrastructure layer implements. It depends only on `chatpair-types`
//! -- never on `chatpair-infra` or any database/IO crate.

pub mod repository;
pub mod response;
pub mod service;
