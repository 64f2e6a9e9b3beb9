//! Orchestrator configuration: prompts and the tool retry budget.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant with access to various tools. \
You should actively use the available tools to help users accomplish their tasks. \
When a user asks for something that could benefit from using a tool, always prefer using the \
appropriate tool rather than just providing a text response. Be proactive in suggesting and \
using tools that can provide more accurate, up-to-date, or comprehensive information. \
Your goal is to leverage your tools effectively to give users the best possible assistance.";

pub const DEFAULT_TITLE_PROMPT: &str =
    "Summarize this conversation as one short noun phrase, focused on the user's question.";

/// Agent loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Seeded as the first message of every new session.
    pub system_prompt: String,
    /// Instruction appended (transiently) when naming a new session.
    pub title_prompt: String,
    /// Failed-dispatch turns that re-offer the full tool set (valid range: 0-10).
    pub max_tool_retries: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            title_prompt: DEFAULT_TITLE_PROMPT.to_string(),
            max_tool_retries: 3,
        }
    }
}
