//! Test doubles for the gateway, the store, and tool capabilities.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use skipery_common::SessionId;
use tokio::sync::Notify;

use crate::message::{Message, ToolCall};
use crate::store::{MemoryStore, SessionStore, SessionSummary, StoreError};
use crate::tools::{ToolCapability, ToolDefinition, ToolError};
use crate::{AiError, ModelGateway};

/// What the gateway saw on one call.
#[derive(Debug, Clone)]
pub struct GatewayCall {
    pub tool_names: Vec<String>,
    pub history: Vec<Message>,
}

/// Replies from a fixed script, one entry per call.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Result<Message, AiError>>>,
    calls: Mutex<Vec<GatewayCall>>,
    /// When set, each call waits for a notification before replying.
    gate: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    pub fn new(script: impl IntoIterator<Item = Result<Message, AiError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn replies(replies: impl IntoIterator<Item = Message>) -> Self {
        Self::new(replies.into_iter().map(Ok))
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn send(
        &self,
        tools: &[ToolDefinition],
        history: &[Message],
    ) -> Result<Message, AiError> {
        self.calls.lock().unwrap().push(GatewayCall {
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
            history: history.to_vec(),
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(AiError::ApiError("script exhausted".into())))
    }
}

/// `MemoryStore` wrapper that counts calls and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    save_title_calls: AtomicUsize,
    append_calls: AtomicUsize,
    appended: Mutex<Vec<Message>>,
    fail_gets: AtomicBool,
    fail_appends: AtomicBool,
}

impl RecordingStore {
    pub fn save_title_calls(&self) -> usize {
        self.save_title_calls.load(Ordering::SeqCst)
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// Every message passed to a successful `append_messages`, in order.
    pub fn appended(&self) -> Vec<Message> {
        self.appended.lock().unwrap().clone()
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn title(&self, id: &SessionId) -> Option<String> {
        self.inner.title(id)
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn save_title(&self, id: &SessionId, title: &str) -> Result<SessionId, StoreError> {
        self.save_title_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.save_title(id, title).await
    }

    async fn get_messages(&self, id: &SessionId) -> Result<Vec<Message>, StoreError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("get_messages disabled".into()));
        }
        self.inner.get_messages(id).await
    }

    async fn append_messages(
        &self,
        id: &SessionId,
        messages: &[Message],
    ) -> Result<(), StoreError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("append_messages disabled".into()));
        }
        self.appended.lock().unwrap().extend_from_slice(messages);
        self.inner.append_messages(id, messages).await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        self.inner.list_sessions().await
    }
}

/// A capability whose single function always fails.
pub struct FailingTool {
    pub name: &'static str,
}

#[async_trait]
impl ToolCapability for FailingTool {
    fn functions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new(
            self.name,
            self.name,
            "always fails",
            json!({ "type": "object", "properties": {} }),
        )]
    }

    async fn call(&self, function: &str, _args: &Map<String, Value>) -> Result<Value, ToolError> {
        Err(ToolError::failed(function, "boom"))
    }
}

pub fn call(name: &str, args: Value) -> ToolCall {
    let args = match args {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    ToolCall::new(name, args)
}

pub fn text(reply: &str) -> Message {
    Message::model(reply, vec![])
}

pub fn calls(calls: Vec<ToolCall>) -> Message {
    Message::model("", calls)
}
