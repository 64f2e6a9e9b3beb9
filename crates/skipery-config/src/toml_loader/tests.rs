//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_skipery_config.toml"));
    assert!(matches!(
        result.unwrap_err(),
        skipery_common::ConfigError::FileNotFound(_)
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[agent]
system_prompt = "You are terse."

[model]
model = "gemini-2.0-flash"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.system_prompt, "You are terse.");
    assert_eq!(config.model.model, "gemini-2.0-flash");
    // Defaults preserved
    assert_eq!(config.agent.max_tool_retries, 3);
    assert_eq!(config.model.max_tokens, 4096);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, skipery_common::ConfigError::ParseError(_)));
}

#[test]
fn create_default_config_writes_loadable_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.max_tool_retries, 3);
    assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
}

#[test]
fn default_config_path_is_under_skipery() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("skipery/config.toml"));
    }
}
