//! The model/tool turn loop.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::message::{Message, ToolResult};
use crate::session::ChatSession;
use crate::tools::ToolDefinition;

use super::{cancellable, Agent, AgentError};

impl Agent {
    /// Alternate model calls and tool dispatch until the model answers
    /// without requesting any tool.
    ///
    /// A turn with a failed dispatch spends one retry and keeps the full
    /// tool set on offer. Once retries run out, failed turns continue with
    /// the tool set withheld. A turn without failures always re-offers it.
    pub(crate) async fn run_turns(
        &self,
        session: &mut ChatSession,
        cancel: &CancellationToken,
    ) -> Result<(), AgentError> {
        let definitions = self.tools.definitions();
        let max_retries = self.config.max_tool_retries;
        let mut retries = 0u32;
        let mut offer_tools = true;
        let mut turn = 0usize;

        loop {
            turn += 1;
            let tools: &[ToolDefinition] = if offer_tools { &definitions[..] } else { &[] };
            debug!(
                session = %session.id(),
                turn,
                retries,
                tools = tools.len(),
                "Requesting model reply"
            );

            let reply = cancellable(cancel, self.gateway.send(tools, session.messages()))
                .await?
                .map_err(AgentError::ModelUnavailable)?;

            let calls = reply.tool_calls.clone();
            session.append(reply);
            if calls.is_empty() {
                debug!(session = %session.id(), turn, "Model answered");
                return Ok(());
            }

            let mut results = Vec::with_capacity(calls.len());
            let mut failed = false;
            for call in &calls {
                match cancellable(cancel, self.tools.call(&call.name, &call.args)).await? {
                    Ok(payload) => results.push(ToolResult::new(&call.name, payload)),
                    Err(err) => {
                        warn!(function = %call.name, error = %err, "Tool call failed");
                        failed = true;
                        results.push(ToolResult::error(&call.name, err.to_string()));
                    }
                }
            }
            session.append(Message::tool_results(results));

            offer_tools = if !failed {
                true
            } else if retries < max_retries {
                retries += 1;
                true
            } else {
                false
            };
        }
    }
}
