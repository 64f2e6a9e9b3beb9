//! Agent orchestrator.
//!
//! `Agent::send_message` is the single entry point: it loads (or starts) a
//! session, runs the model/tool turn loop, names new sessions, and persists
//! what the call produced.

pub mod title;
mod turn_loop;


use std::future::Future;
use std::sync::Arc;

use skipery_common::SessionId;
use skipery_config::AgentConfig;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::message::Message;
use crate::session::{ChatSession, SessionLocks};
use crate::store::{SessionStore, StoreError};
use crate::tools::ToolDispatcher;
use crate::{AiError, ModelGateway};

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(#[source] AiError),
    #[error("session store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
    #[error("title generation failed: {0}")]
    TitleGenerationFailed(#[source] AiError),
    #[error("failed to persist session: {0}")]
    PersistFailed(#[source] StoreError),
    #[error("cancelled")]
    Cancelled,
}

/// Race `fut` against the cancellation token.
pub(crate) async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, AgentError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AgentError::Cancelled),
        out = fut => Ok(out),
    }
}

pub struct Agent {
    gateway: Arc<dyn ModelGateway>,
    tools: ToolDispatcher,
    store: Arc<dyn SessionStore>,
    config: AgentConfig,
    locks: SessionLocks,
}

impl Agent {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        tools: ToolDispatcher,
        store: Arc<dyn SessionStore>,
        config: AgentConfig,
    ) -> Self {
        Self {
            gateway,
            tools,
            store,
            config,
            locks: SessionLocks::new(),
        }
    }

    pub fn tools(&self) -> &ToolDispatcher {
        &self.tools
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run one user message to completion.
    ///
    /// Returns the messages produced after the user message, in emission
    /// order. On error nothing from this call is persisted, except that a
    /// new session's title is saved before its messages.
    pub async fn send_message(
        &self,
        id: &SessionId,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>, AgentError> {
        let _guard = cancellable(cancel, self.locks.acquire(id)).await?;

        let store = self.store.as_ref();
        let mut session = cancellable(
            cancel,
            ChatSession::load(id.clone(), store, &self.config.system_prompt),
        )
        .await?
        .map_err(AgentError::StoreUnavailable)?;

        session.append_user_message(text);
        let produced_from = session.len();

        self.run_turns(&mut session, cancel).await?;

        if session.is_new() {
            let title = cancellable(
                cancel,
                title::generate_title(
                    self.gateway.as_ref(),
                    session.messages(),
                    &self.config.title_prompt,
                ),
            )
            .await?
            .map_err(AgentError::TitleGenerationFailed)?;

            cancellable(cancel, session.finalize_title(store, &title))
                .await?
                .map_err(AgentError::PersistFailed)?;
            info!(session = %id, title = %title, "Session titled");
        }

        cancellable(cancel, session.persist_new(store))
            .await?
            .map_err(AgentError::PersistFailed)?;

        Ok(session.messages()[produced_from..].to_vec())
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("tools", &self.tools)
            .field("config", &self.config)
            .finish()
    }
}
