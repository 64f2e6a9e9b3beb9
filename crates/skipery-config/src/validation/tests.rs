//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    assert!(validate(&SkiperyConfig::default()).is_ok());
}

#[test]
fn catches_retry_budget_too_large() {
    let mut config = SkiperyConfig::default();
    config.agent.max_tool_retries = 11;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("agent.max_tool_retries"));
}

#[test]
fn zero_retries_is_allowed() {
    let mut config = SkiperyConfig::default();
    config.agent.max_tool_retries = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_empty_system_prompt() {
    let mut config = SkiperyConfig::default();
    config.agent.system_prompt = "   ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("agent.system_prompt must not be empty"));
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = SkiperyConfig::default();
    config.model.temperature = 3.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.temperature"));
}

#[test]
fn catches_zero_max_tokens() {
    let mut config = SkiperyConfig::default();
    config.model.max_tokens = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.max_tokens"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = SkiperyConfig::default();
    config.model.model = String::new();
    config.model.temperature = -1.0;
    config.agent.title_prompt = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.model"));
    assert!(err.contains("model.temperature"));
    assert!(err.contains("agent.title_prompt"));
    assert_eq!(err.matches("; ").count(), 2);
}
