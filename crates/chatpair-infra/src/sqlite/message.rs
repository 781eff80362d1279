//! SQLite message store implementation.
//!
//! Implements `MessageStore` and `MessageTransaction` from `chatpair-core`
//! using sqlx with split read/write pools. Transactions are opened on the
//! single-connection writer pool; an uncommitted `sqlx::Transaction` rolls
//! back when dropped.

use chatpair_core::repository::message::{MessageStore, MessageTransaction};
use chatpair_types::error::RepositoryError;
use chatpair_types::message::{Message, MessageId, NewMessage, Sender};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, Sqlite, Transaction};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageStore`.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// A write transaction on the messages table.
pub struct SqliteMessageTransaction {
    tx: Transaction<'static, Sqlite>,
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    content: String,
    sender: String,
    created_at: String,
    updated_at: String,
    parent_message_id: Option<i64>,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            sender: row.try_get("sender")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            parent_message_id: row.try_get("parent_message_id")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Message {
            id: MessageId(self.id),
            content: self.content,
            sender,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            parent_message_id: self.parent_message_id.map(MessageId),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width so that text order in SQLite matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Pool exhaustion or shutdown and I/O failures are connection errors; the
/// rest surface as query errors.
fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Message, RepositoryError> {
    MessageRow::from_row(row)
        .map_err(map_sqlx_error)?
        .into_message()
}

// ---------------------------------------------------------------------------
// MessageStore impl
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    type Tx = SqliteMessageTransaction;

    async fn begin(&self) -> Result<SqliteMessageTransaction, RepositoryError> {
        let tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(map_sqlx_error)?;

        Ok(SqliteMessageTransaction { tx })
    }

    async fn list_messages(&self) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM messages ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(map_row).collect()
    }
}

// ---------------------------------------------------------------------------
// MessageTransaction impl
// ---------------------------------------------------------------------------

impl MessageTransaction for SqliteMessageTransaction {
    async fn insert(&mut self, message: &NewMessage) -> Result<Message, RepositoryError> {
        let created_at = format_datetime(&message.created_at);

        let result = sqlx::query(
            "INSERT INTO messages (content, sender, created_at, updated_at, parent_message_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.content)
        .bind(message.sender.to_string())
        .bind(&created_at)
        .bind(&created_at)
        .bind(message.parent_message_id.map(MessageId::as_i64))
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        let id = MessageId(result.last_insert_rowid());
        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn get(&mut self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn find_reply(&mut self, parent: MessageId) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM messages WHERE parent_message_id = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(parent.as_i64())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn update_content(
        &mut self,
        id: MessageId,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Message, RepositoryError> {
        let result = sqlx::query("UPDATE messages SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(format_datetime(&updated_at))
            .bind(id.as_i64())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&mut self, id: MessageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id.as_i64())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&mut self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count as u64)
    }

    async fn commit(self) -> Result<(), RepositoryError> {
        self.tx
            .commit()
            .await
            .map_err(map_sqlx_error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chatpair_core::response::{CannedResponseGenerator, DEFAULT_RESPONSES};
    use chatpair_core::service::message::MessageService;
    use chatpair_types::error::MessageError;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn test_store() -> SqliteMessageStore {
        SqliteMessageStore::new(test_pool().await)
    }

    // -- Store --

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = test_store().await;

        let mut tx = store.begin().await.unwrap();
        let msg = tx
            .insert(&NewMessage::now("Hello", Sender::User, None))
            .await
            .unwrap();
        let fetched = tx.get(msg.id).await.unwrap().unwrap();
        tx.commit().await.unwrap();

        assert_eq!(fetched, msg);
        assert_eq!(msg.created_at, msg.updated_at);
        assert!(msg.parent_message_id.is_none());
    }

    #[tokio::test]
    async fn test_closed_pool_is_connection_error() {
        let pool = test_pool().await;
        let store = SqliteMessageStore::new(pool.clone());
        pool.writer.close().await;
        pool.reader.close().await;

        assert!(matches!(store.begin().await, Err(RepositoryError::Connection)));
        assert!(matches!(
            store.list_messages().await,
            Err(RepositoryError::Connection)
        ));
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_rolls_back() {
        let store = test_store().await;

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert(&NewMessage::now("Gone", Sender::User, None))
                .await
                .unwrap();
            // dropped without commit
        }

        assert!(store.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = test_store().await;

        let mut tx = store.begin().await.unwrap();
        let first = tx
            .insert(&NewMessage::now("One", Sender::User, None))
            .await
            .unwrap();
        tx.delete(first.id).await.unwrap();
        let second = tx
            .insert(&NewMessage::now("Two", Sender::User, None))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_reply_returns_first_child() {
        let store = test_store().await;

        let mut tx = store.begin().await.unwrap();
        let parent = tx
            .insert(&NewMessage::now("Q", Sender::User, None))
            .await
            .unwrap();
        let reply = tx
            .insert(&NewMessage::now("A", Sender::Bot, Some(parent.id)))
            .await
            .unwrap();
        tx.insert(&NewMessage::now("A2", Sender::Bot, Some(parent.id)))
            .await
            .unwrap();

        let found = tx.find_reply(parent.id).await.unwrap().unwrap();
        assert_eq!(found.id, reply.id);
        assert!(tx.find_reply(reply.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_content_refreshes_updated_at() {
        let store = test_store().await;

        let mut tx = store.begin().await.unwrap();
        let msg = tx
            .insert(&NewMessage::now("Before", Sender::User, None))
            .await
            .unwrap();
        let later = msg.created_at + chrono::Duration::seconds(5);
        let updated = tx.update_content(msg.id, "After", later).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(updated.content, "After");
        assert_eq!(updated.created_at, msg.created_at);
        assert!(updated.updated_at > msg.updated_at);
    }

    #[tokio::test]
    async fn test_update_content_missing_row() {
        let store = test_store().await;
        let mut tx = store.begin().await.unwrap();
        let err = tx
            .update_content(MessageId(42), "x", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let store = test_store().await;

        let mut tx = store.begin().await.unwrap();
        let msg = tx
            .insert(&NewMessage::now("Temp", Sender::User, None))
            .await
            .unwrap();
        assert_eq!(tx.count().await.unwrap(), 1);
        assert!(tx.delete(msg.id).await.unwrap());
        assert!(!tx.delete(msg.id).await.unwrap());
        assert_eq!(tx.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_orders_by_created_at_then_id() {
        let store = test_store().await;
        let now = Utc::now();

        let mut tx = store.begin().await.unwrap();
        let late = NewMessage {
            content: "late".to_string(),
            sender: Sender::User,
            created_at: now + chrono::Duration::seconds(10),
            parent_message_id: None,
        };
        let early = NewMessage {
            content: "early".to_string(),
            sender: Sender::User,
            created_at: now,
            parent_message_id: None,
        };
        tx.insert(&late).await.unwrap();
        let a = tx.insert(&early).await.unwrap();
        // Same instant as `early`: ties break on id
        let b = tx
            .insert(&NewMessage {
                content: "early reply".to_string(),
                sender: Sender::Bot,
                created_at: now,
                parent_message_id: Some(a.id),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let contents: Vec<String> = store
            .list_messages()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["early", "early reply", "late"]);
        assert!(a.id < b.id);
    }

    // -- Service against SQLite --

    #[tokio::test]
    async fn test_service_create_update_delete_cycle() {
        let store = test_store().await;
        let service = MessageService::new(store.clone(), CannedResponseGenerator::default());

        let msg = service
            .create("Hello, I have a question about Artisan", Sender::User, None)
            .await
            .unwrap();

        let messages = service.list().await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, msg.id);
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].parent_message_id, Some(msg.id));
        assert!(DEFAULT_RESPONSES.contains(&messages[1].content.as_str()));

        let bot_id = messages[1].id;
        let updated = service.update(msg.id, "Edited").await.unwrap();
        assert_eq!(updated.content, "Edited");

        let messages = service.list().await.unwrap();
        let bots: Vec<_> = messages.iter().filter(|m| m.sender == Sender::Bot).collect();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].id, bot_id);
        assert_eq!(bots[0].parent_message_id, Some(msg.id));

        service.delete(msg.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_forbidden_leaves_store_unchanged() {
        let store = test_store().await;
        let service = MessageService::new(store.clone(), CannedResponseGenerator::default());

        service.create("Test message", Sender::User, None).await.unwrap();
        let before = service.list().await.unwrap();
        let bot_id = before[1].id;

        let err = service.update(bot_id, "Trying to edit").await.unwrap_err();
        assert!(matches!(err, MessageError::Forbidden(_)));
        let err = service.delete(bot_id).await.unwrap_err();
        assert!(matches!(err, MessageError::Forbidden(_)));

        assert_eq!(service.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_service_seed_greeting() {
        let store = test_store().await;
        let service = MessageService::new(store, CannedResponseGenerator::default());

        assert!(service.seed_greeting("Hi! Where would you like to start?").await.unwrap());
        assert!(!service.seed_greeting("Hi again").await.unwrap());

        let messages = service.list().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Bot);
    }
}
