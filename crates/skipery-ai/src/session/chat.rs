//! In-memory message log for one conversation.

use skipery_common::SessionId;
use tracing::debug;

use crate::message::Message;
use crate::store::{SessionStore, StoreError};

#[derive(Debug, Clone)]
pub struct ChatSession {
    id: SessionId,
    title: Option<String>,
    messages: Vec<Message>,
    is_new: bool,
    /// Messages before this index are already in the store.
    saved_index: usize,
}

impl ChatSession {
    /// Load a session's history, or start a new one seeded with
    /// `system_prompt` when the store has nothing for `id`.
    ///
    /// The seeded system message is not persisted until `persist_new`.
    pub async fn load(
        id: SessionId,
        store: &dyn SessionStore,
        system_prompt: &str,
    ) -> Result<Self, StoreError> {
        let messages = store.get_messages(&id).await?;
        if messages.is_empty() {
            debug!(session = %id, "Starting new session");
            return Ok(Self {
                id,
                title: None,
                messages: vec![Message::system(system_prompt)],
                is_new: true,
                saved_index: 0,
            });
        }

        debug!(session = %id, messages = messages.len(), "Loaded session history");
        let saved_index = messages.len();
        Ok(Self {
            id,
            title: None,
            messages,
            is_new: false,
            saved_index,
        })
    }

    pub fn append_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages not yet handed to the store.
    pub fn new_messages(&self) -> &[Message] {
        &self.messages[self.saved_index..]
    }

    /// Append the unsaved suffix to the store. Calling it again without new
    /// messages does nothing.
    pub async fn persist_new(&mut self, store: &dyn SessionStore) -> Result<(), StoreError> {
        if self.saved_index >= self.messages.len() {
            return Ok(());
        }
        store
            .append_messages(&self.id, self.new_messages())
            .await?;
        debug!(
            session = %self.id,
            count = self.messages.len() - self.saved_index,
            "Persisted messages"
        );
        self.saved_index = self.messages.len();
        Ok(())
    }

    /// Save the title of a new session. No-op once the session is known
    /// to the store.
    pub async fn finalize_title(
        &mut self,
        store: &dyn SessionStore,
        title: &str,
    ) -> Result<(), StoreError> {
        if !self.is_new {
            return Ok(());
        }
        store.save_title(&self.id, title).await?;
        self.is_new = false;
        self.title = Some(title.to_string());
        Ok(())
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The title saved during this call, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
