//! Application state wiring the chat history store.
//!
//! AppState holds the concrete store used by both CLI and REST API. The
//! store is generic over its repository; AppState pins it to the SQLite
//! implementation. Dependencies are constructed explicitly here, in order:
//! pool, repository, store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chatty_core::chat::store::ChatHistoryStore;
use chatty_infra::config::resolve_database_url;
use chatty_infra::sqlite::chat::SqliteChatRepository;
use chatty_infra::sqlite::pool::DatabasePool;
use chatty_infra::sqlite::retry::RetryPolicy;
use chatty_types::config::GlobalConfig;

/// Concrete type alias for the store pinned to the infra implementation.
pub type ConcreteChatStore = ChatHistoryStore<SqliteChatRepository>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_store: Arc<ConcreteChatStore>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub database_url: String,
}

impl AppState {
    /// Connect to the database and wire the store.
    pub async fn init(data_dir: PathBuf, config: GlobalConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let database_url = resolve_database_url(&config, &data_dir);
        let retry = RetryPolicy::from_config(&config.database);
        let db_pool = DatabasePool::new(&database_url, retry)
            .await
            .with_context(|| format!("Failed to open database {database_url}"))?;

        let chat_store = ChatHistoryStore::with_max_message_bytes(
            SqliteChatRepository::new(db_pool),
            config.history.max_message_bytes,
        );

        Ok(Self {
            chat_store: Arc::new(chat_store),
            config: Arc::new(config),
            data_dir,
            database_url,
        })
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// State backed by a fresh database in a temporary directory.
    ///
    /// The returned `TempDir` must be kept alive for the duration of the test.
    pub async fn test_state(config: GlobalConfig) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = GlobalConfig {
            database: chatty_types::config::DatabaseConfig {
                url: Some(format!(
                    "sqlite://{}?mode=rwc",
                    dir.path().join("test.db").display()
                )),
                ..config.database.clone()
            },
            ..config
        };
        let state = AppState::init(dir.path().to_path_buf(), config)
            .await
            .unwrap();
        (state, dir)
    }
}
