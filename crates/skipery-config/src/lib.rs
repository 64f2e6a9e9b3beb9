//! skipery configuration.
//!
//! TOML-based configuration with validation. Every section has defaults,
//! so a partial (or missing) config file works out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AgentConfig, LogLevel, LoggingConfig, ModelConfig, SkiperyConfig, StorageConfig,
    CONFIG_SCHEMA_VERSION,
};

use skipery_common::ConfigError;
use std::path::Path;

/// Load the config from `path` if given, otherwise from the platform
/// default location, then validate it.
pub fn load_config(path: Option<&Path>) -> Result<SkiperyConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\ntemperature = 9.0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[agent]\nmax_tool_retries = 1\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.agent.max_tool_retries, 1);
    }
}
