//! Conversation messages.
//!
//! A model reply carries text, tool calls, or both. Tool outcomes travel
//! back in a separate user-authored message built by the orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Model,
    System,
}

impl Author {
    pub fn as_str(&self) -> &'static str {
        match self {
            Author::User => "user",
            Author::Model => "model",
            Author::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Author::User),
            "model" => Some(Author::Model),
            "system" => Some(Author::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Outcome of one dispatched tool call, keyed by the function name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    pub payload: Value,
}

impl ToolResult {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// A failed call: `{"error": message}`.
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, serde_json::json!({ "error": message.into() }))
    }

    pub fn is_error(&self) -> bool {
        self.payload.get("error").is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub author: Author,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<ToolResult>,
}

impl Message {
    fn with_text(author: Author, text: impl Into<String>) -> Self {
        Self {
            author,
            text: text.into(),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_text(Author::User, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::with_text(Author::System, text)
    }

    pub fn model(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::with_text(Author::Model, text)
        }
    }

    /// The synthetic message that feeds tool outcomes back to the model.
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self {
            tool_results: results,
            ..Self::with_text(Author::User, "")
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn is_tool_result(&self) -> bool {
        !self.tool_results.is_empty()
    }

    /// System messages are kept out of the user-facing transcript.
    pub fn is_visible(&self) -> bool {
        self.author != Author::System
    }
}
