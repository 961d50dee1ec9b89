//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. This module provides a `DatabasePool`
//! with a multi-connection reader pool for concurrent reads and a single-connection
//! writer pool for serialized writes. Both use WAL journal mode.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use super::retry::RetryPolicy;

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool (up to 8) for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT statements.
/// - `retry`: policy applied by repositories to every query.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
    pub retry: RetryPolicy,
}

impl DatabasePool {
    /// Create a new DatabasePool with split reader/writer connections.
    ///
    /// Runs migrations automatically on the writer pool. Opening the writer is
    /// retried under `retry` so a database briefly locked by another process
    /// does not abort startup.
    ///
    /// In-memory URLs are rejected: each pool connection would open its own
    /// private database, so readers would never see the writer's tables.
    pub async fn new(database_url: &str, retry: RetryPolicy) -> Result<Self, sqlx::Error> {
        if is_in_memory(database_url) {
            return Err(sqlx::Error::Configuration(
                format!("in-memory database '{database_url}' is not supported; use a file path").into(),
            ));
        }

        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = retry
            .run("connect writer", || {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(write_opts.clone())
            })
            .await?;

        // Run migrations on writer before opening reader pool
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = retry
            .run("connect reader", || {
                SqlitePoolOptions::new()
                    .max_connections(8)
                    .connect_with(read_opts.clone())
            })
            .await?;

        tracing::debug!(url = %database_url, "Database pool ready");

        Ok(Self {
            reader,
            writer,
            retry,
        })
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Build the `sqlite://` URL for a database file inside `data_dir`.
pub fn database_url_for(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("chatty.db").display())
}
