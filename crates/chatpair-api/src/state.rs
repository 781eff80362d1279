//! Application state wiring the message service together.
//!
//! AppState holds the concrete service instance used by both CLI and REST API.
//! The service is generic over store and reply-generator traits, but AppState
//! pins it to the SQLite store and the canned generator.

use std::path::PathBuf;
use std::sync::Arc;

use chatpair_core::response::CannedResponseGenerator;
use chatpair_core::service::message::MessageService;
use chatpair_infra::config::load_config;
use chatpair_infra::resolve_data_dir;
use chatpair_infra::sqlite::message::SqliteMessageStore;
use chatpair_infra::sqlite::pool::{default_database_url, DatabasePool};
use chatpair_types::config::AppConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteMessageService = MessageService<SqliteMessageStore, CannedResponseGenerator>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<ConcreteMessageService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&default_database_url()).await?;

        Ok(Self::from_parts(db_pool, config, data_dir))
    }

    /// Wire the state from an already-open pool.
    pub fn from_parts(db_pool: DatabasePool, config: AppConfig, data_dir: PathBuf) -> Self {
        let generator = CannedResponseGenerator::new(config.responses.clone());
        let message_service = MessageService::new(SqliteMessageStore::new(db_pool), generator);

        Self {
            message_service: Arc::new(message_service),
            config: Arc::new(config),
            data_dir,
        }
    }
}
