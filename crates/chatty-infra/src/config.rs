//! Global configuration loader for Chatty.
//!
//! Reads `config.toml` from the data directory (`~/.chatty/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use chatty_types::config::GlobalConfig;

use crate::sqlite::pool::database_url_for;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATTY_DATA_DIR";

/// Environment variable overriding `database.url`.
pub const DATABASE_URL_ENV: &str = "CHATTY_DATABASE_URL";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority: `CHATTY_DATA_DIR`, then `~/.chatty`, then `./.chatty`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatty");
    }

    PathBuf::from(".chatty")
}

/// Resolve the database URL.
///
/// Priority: `CHATTY_DATABASE_URL`, then `database.url` from config, then
/// `chatty.db` inside the data directory.
pub fn resolve_database_url(config: &GlobalConfig, data_dir: &Path) -> String {
    let env_url = std::env::var(DATABASE_URL_ENV).ok();
    pick_database_url(env_url, config, data_dir)
}

fn pick_database_url(env_url: Option<String>, config: &GlobalConfig, data_dir: &Path) -> String {
    env_url
        .filter(|url| !url.trim().is_empty())
        .or_else(|| config.database.url.clone())
        .unwrap_or_else(|| database_url_for(data_dir))
}
