//! Tool capabilities the model can call.
//!
//! A capability exposes one or more functions. The dispatcher flattens
//! every registered capability into a single name-keyed table.

mod builtin;
mod dispatcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use builtin::{MathTool, UserNameTool};
pub use dispatcher::ToolDispatcher;

/// Descriptor of one callable function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
    /// JSON schema of the result payload, when the capability declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            parameters,
            response: None,
        }
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    fn has_parameters(&self) -> bool {
        self.parameters
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|props| !props.is_empty())
    }
}

/// Convert a tool definition to a Gemini function declaration.
///
/// Gemini rejects an object schema with no properties, so argument-less
/// functions are declared without `parameters`.
pub fn to_gemini_tool(tool: &ToolDefinition) -> Value {
    let mut decl = serde_json::json!({
        "name": tool.name,
        "description": tool.description,
    });
    if tool.has_parameters() {
        decl["parameters"] = tool.parameters.clone();
    }
    decl
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("unknown function: {0}")]
    NotFound(String),
    #[error("{name} failed: {message}")]
    ExecutionFailed { name: String, message: String },
}

impl ToolError {
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// A provider of callable functions.
#[async_trait]
pub trait ToolCapability: Send + Sync {
    /// The functions this capability exposes.
    fn functions(&self) -> Vec<ToolDefinition>;

    async fn call(&self, function: &str, args: &Map<String, Value>) -> Result<Value, ToolError>;
}
