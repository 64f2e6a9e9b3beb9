//! Agent engine for skipery.
//!
//! Turns one user message into a finished exchange with a language model
//! that may call tools before answering:
//! - Chat sessions with incremental persistence
//! - The model/tool turn loop with a bounded retry budget
//! - Title generation for new sessions
//! - A Gemini model gateway and a registry of tool capabilities

pub mod agent;
pub mod gemini;
pub mod message;
pub mod session;
pub mod store;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use agent::{Agent, AgentError};
pub use gemini::{GeminiClient, GeminiConfig};
pub use message::{Author, Message, ToolCall, ToolResult};
pub use session::{ChatSession, SessionLocks};
pub use skipery_common::SessionId;
pub use store::{MemoryStore, SessionStore, SessionSummary, StoreError};
pub use tools::{MathTool, ToolCapability, ToolDefinition, ToolDispatcher, ToolError, UserNameTool};

/// A language-model backend.
///
/// Given the callable tools and the conversation so far, produces exactly
/// one next message. The reply carries `tool_calls` if and only if the
/// backend asked for function invocations.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn send(&self, tools: &[ToolDefinition], history: &[Message])
        -> Result<Message, AiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
