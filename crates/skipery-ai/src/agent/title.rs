//! Session title generation.

use crate::message::{Author, Message};
use crate::{AiError, ModelGateway};

const FALLBACK_TITLE_CHARS: usize = 60;

/// Ask the model to name a conversation.
///
/// The instruction is appended to a copy of `history`, so the caller's
/// session never sees it. No tools are offered. A blank reply falls back
/// to the start of the first user message.
pub async fn generate_title(
    gateway: &dyn ModelGateway,
    history: &[Message],
    prompt: &str,
) -> Result<String, AiError> {
    let mut messages = history.to_vec();
    messages.push(Message::user(prompt));

    let reply = gateway.send(&[], &messages).await?;
    if !reply.text.trim().is_empty() {
        return Ok(reply.text);
    }
    Ok(fallback_title(history))
}

fn fallback_title(history: &[Message]) -> String {
    history
        .iter()
        .find(|m| m.author == Author::User && !m.is_tool_result() && !m.text.trim().is_empty())
        .map(|m| m.text.trim().chars().take(FALLBACK_TITLE_CHARS).collect())
        .unwrap_or_else(|| "New conversation".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{text, ScriptedGateway};

    #[tokio::test]
    async fn returns_reply_text_verbatim() {
        let gateway = ScriptedGateway::replies([text("Adding two numbers\n")]);
        let history = vec![Message::system("p"), Message::user("what is 2+2?")];

        let title = generate_title(&gateway, &history, "Name it").await.unwrap();
        assert_eq!(title, "Adding two numbers\n");
    }

    #[tokio::test]
    async fn instruction_is_appended_to_a_copy() {
        let gateway = ScriptedGateway::replies([text("T")]);
        let history = vec![Message::user("hello")];

        generate_title(&gateway, &history, "Name it").await.unwrap();

        assert_eq!(history.len(), 1);
        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].tool_names.is_empty());
        assert_eq!(calls[0].history.len(), 2);
        assert_eq!(calls[0].history[1], Message::user("Name it"));
    }

    #[tokio::test]
    async fn blank_reply_falls_back_to_user_message() {
        let gateway = ScriptedGateway::replies([text("   ")]);
        let long = "x".repeat(100);
        let history = vec![Message::system("p"), Message::user(long)];

        let title = generate_title(&gateway, &history, "Name it").await.unwrap();
        assert_eq!(title, "x".repeat(60));
    }

    #[tokio::test]
    async fn gateway_error_propagates() {
        let gateway = ScriptedGateway::new([Err(AiError::RateLimited)]);
        let err = generate_title(&gateway, &[Message::user("hi")], "Name it")
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::RateLimited));
    }
}
