//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# skipery configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[agent]
# system_prompt = "You are a helpful AI assistant with access to various tools. ..."
# title_prompt = "Summarize this conversation as one short noun phrase, focused on the user's question."
# max_tool_retries = 3      # 0-10

[model]
# model = "gemini-2.5-flash-lite"
# max_tokens = 4096         # 1-65536
# temperature = 0.7         # 0.0-2.0
# api_key_env = "GEMINI_API_KEY"

[storage]
# db_path = "/path/to/agent.db"   # DB_PATH overrides this

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
    .to_string()
}
