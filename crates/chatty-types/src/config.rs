//! Global configuration types for Chatty.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! database connection, HTTP server, logging, and history limits.

use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_MAX_MESSAGE_BYTES;

/// Top-level configuration for the Chatty service.
///
/// Loaded from `~/.chatty/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL. Defaults to `<data_dir>/chatty.db` when unset.
    #[serde(default)]
    pub url: Option<String>,

    /// Retry transient failures (busy/locked database, I/O, pool timeouts).
    #[serde(default = "default_true")]
    pub retry_on_failure: bool,

    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Upper bound for the backoff between two attempts.
    #[serde(default = "default_max_retry_delay_secs")]
    pub max_retry_delay_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    6
}

fn default_max_retry_delay_secs() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            retry_on_failure: true,
            max_retries: default_max_retries(),
            max_retry_delay_secs: default_max_retry_delay_secs(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Serve Swagger UI at `/swagger-ui` and the OpenAPI document at `/api-docs/openapi.json`.
    #[serde(default = "default_true")]
    pub enable_swagger: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_swagger: true,
        }
    }
}

/// Logging settings. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
            otel: false,
        }
    }
}

/// Limits applied to stored history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

fn default_max_message_bytes() -> usize {
    DEFAULT_MAX_MESSAGE_BYTES
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert!(config.database.url.is_none());
        assert!(config.database.retry_on_failure);
        assert_eq!(config.database.max_retries, 6);
        assert_eq!(config.server.port, 3000);
        assert!(config.server.enable_swagger);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.history.max_message_bytes, 32 * 1024);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.database.max_retry_delay_secs, 30);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_global_config_deserialize_partial_sections() {
        let toml_str = r#"
[database]
url = "sqlite:///tmp/chatty.db"
retry_on_failure = false

[server]
port = 8080
enable_swagger = false

[history]
max_message_bytes = 1024
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.url.as_deref(), Some("sqlite:///tmp/chatty.db"));
        assert!(!config.database.retry_on_failure);
        assert_eq!(config.database.max_retries, 6);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.server.enable_swagger);
        assert_eq!(config.history.max_message_bytes, 1024);
        assert_eq!(config.logging.filter, "info");
    }
}
