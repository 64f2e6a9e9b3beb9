//! Line-oriented chat loop on stdin/stdout.

use std::io::Write;

use skipery_ai::{Agent, AgentError, Message, SessionId, SessionSummary};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Transcript lines for one produced message.
pub fn render(msg: &Message) -> Vec<String> {
    if !msg.is_visible() {
        return Vec::new();
    }
    if msg.has_tool_calls() {
        return msg
            .tool_calls
            .iter()
            .map(|call| {
                let args = serde_json::Value::Object(call.args.clone());
                format!("[author: {}]: {} {}", msg.author, call.name, args)
            })
            .collect();
    }
    if msg.is_tool_result() {
        return msg
            .tool_results
            .iter()
            .map(|result| format!("[author: {}]: {}: {}", msg.author, result.name, result.payload))
            .collect();
    }
    vec![format!("[author: {}]: {}", msg.author, msg.text)]
}

pub fn render_summary(summary: &SessionSummary) -> String {
    format!(
        "{}  {}  ({} messages)",
        summary.id,
        summary.title.as_deref().unwrap_or("(untitled)"),
        summary.message_count
    )
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Read one message per line until EOF or `exit`.
///
/// Ctrl-C cancels the message in flight and returns to the prompt.
pub async fn run(agent: &Agent, session: SessionId) -> std::io::Result<()> {
    info!(session = %session, "Agent started. Type 'exit' to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input == "exit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };
        let result = agent.send_message(&session, input, &cancel).await;
        watcher.abort();

        match result {
            Ok(messages) => {
                for msg in &messages {
                    for line in render(msg) {
                        println!("{line}");
                    }
                }
            }
            Err(AgentError::Cancelled) => println!("(cancelled)"),
            Err(e) => {
                warn!(error = %e, "Message failed");
                println!("Error: {e}");
            }
        }
    }
    Ok(())
}
