//! Full configuration validation.
//!
//! Each section is checked in turn and every problem is collected into a
//! single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::SkiperyConfig;
use skipery_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SkiperyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_agent(&mut errors, config);
    validate_model(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_agent(errors: &mut Vec<String>, config: &SkiperyConfig) {
    validate_non_empty(errors, "agent.system_prompt", &config.agent.system_prompt);
    validate_non_empty(errors, "agent.title_prompt", &config.agent.title_prompt);
    validate_range(
        errors,
        "agent.max_tool_retries",
        config.agent.max_tool_retries,
        0,
        10,
    );
}

fn validate_model(errors: &mut Vec<String>, config: &SkiperyConfig) {
    validate_non_empty(errors, "model.model", &config.model.model);
    validate_non_empty(errors, "model.api_key_env", &config.model.api_key_env);
    validate_range(errors, "model.max_tokens", config.model.max_tokens, 1, 65536);
    validate_range_f64(
        errors,
        "model.temperature",
        config.model.temperature,
        0.0,
        2.0,
    );
}
