//! Chat history storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides `storage.db_path`.
pub const DB_PATH_ENV: &str = "DB_PATH";

/// SQLite storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. Defaults to `<data dir>/skipery/agent.db`.
    pub db_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the database path: `DB_PATH`, then the config value, then
    /// the platform data directory, then `./agent.db`.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        if let Some(ref path) = self.db_path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("skipery").join("agent.db"))
            .unwrap_or_else(|| PathBuf::from("./agent.db"))
    }
}
