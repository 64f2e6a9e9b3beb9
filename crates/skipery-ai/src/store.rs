//! Session persistence interface and an in-memory implementation.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skipery_common::SessionId;

use crate::message::Message;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// One row of a session listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: Option<String>,
    pub message_count: usize,
}

/// Durable storage for session titles and message history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record the title of a session, creating the session if needed.
    /// A session that already has a title keeps it.
    async fn save_title(&self, id: &SessionId, title: &str) -> Result<SessionId, StoreError>;

    /// The full history of a session, oldest first. Unknown ids yield an
    /// empty history.
    async fn get_messages(&self, id: &SessionId) -> Result<Vec<Message>, StoreError>;

    /// Append messages to the end of a session's history.
    async fn append_messages(&self, id: &SessionId, messages: &[Message])
        -> Result<(), StoreError>;

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Default)]
struct StoredSession {
    title: Option<String>,
    messages: Vec<Message>,
}

/// Process-local store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<BTreeMap<SessionId, StoredSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_sessions<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<SessionId, StoredSession>) -> T,
    ) -> T {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut sessions)
    }

    pub fn title(&self, id: &SessionId) -> Option<String> {
        self.with_sessions(|sessions| sessions.get(id).and_then(|s| s.title.clone()))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save_title(&self, id: &SessionId, title: &str) -> Result<SessionId, StoreError> {
        self.with_sessions(|sessions| {
            sessions
                .entry(id.clone())
                .or_default()
                .title
                .get_or_insert_with(|| title.to_string());
        });
        Ok(id.clone())
    }

    async fn get_messages(&self, id: &SessionId) -> Result<Vec<Message>, StoreError> {
        Ok(self.with_sessions(|sessions| {
            sessions
                .get(id)
                .map(|s| s.messages.clone())
                .unwrap_or_default()
        }))
    }

    async fn append_messages(
        &self,
        id: &SessionId,
        messages: &[Message],
    ) -> Result<(), StoreError> {
        self.with_sessions(|sessions| {
            sessions
                .entry(id.clone())
                .or_default()
                .messages
                .extend_from_slice(messages);
        });
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        Ok(self.with_sessions(|sessions| {
            sessions
                .iter()
                .map(|(id, s)| SessionSummary {
                    id: id.clone(),
                    title: s.title.clone(),
                    message_count: s.messages.len(),
                })
                .collect()
        }))
    }
}
