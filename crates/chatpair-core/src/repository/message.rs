//! Message store trait definitions.
//!
//! Reads that need no consistency with a write go straight through
//! [`MessageStore`]. Everything else happens inside a [`MessageTransaction`]
//! obtained from [`MessageStore::begin`]: the service commits it when an
//! operation succeeds, and an uncommitted transaction is rolled back when
//! dropped.

use chatpair_types::error::RepositoryError;
use chatpair_types::message::{Message, MessageId, NewMessage};
use chrono::{DateTime, Utc};

/// Entry point to message persistence.
///
/// Implementations live in chatpair-infra (e.g., `SqliteMessageStore`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageStore: Send + Sync {
    /// Transaction handle type produced by [`MessageStore::begin`].
    type Tx: MessageTransaction;

    /// Open a transaction. Dropping it without `commit` discards its writes.
    fn begin(&self) -> impl std::future::Future<Output = Result<Self::Tx, RepositoryError>> + Send;

    /// List every message ordered by `created_at` ASC, then id ASC.
    fn list_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}

/// A unit of work against the message table.
pub trait MessageTransaction: Send {
    /// Persist a new message. Returns it with its store-assigned id;
    /// `updated_at` equals `created_at`.
    fn insert(
        &mut self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Get a message by id.
    fn get(
        &mut self,
        id: MessageId,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Get the first message (lowest id) whose `parent_message_id` is `parent`.
    fn find_reply(
        &mut self,
        parent: MessageId,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Replace a message's content and `updated_at`. Returns the updated
    /// message, or `NotFound` if the id does not exist.
    fn update_content(
        &mut self,
        id: MessageId,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Delete a message. Returns `true` if a row was removed.
    fn delete(
        &mut self,
        id: MessageId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Count all messages.
    fn count(&mut self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Make every write in this transaction durable.
    fn commit(self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
