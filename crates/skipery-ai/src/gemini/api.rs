//! ModelGateway trait implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::message::Message;
use crate::tools::ToolDefinition;
use crate::{AiError, ModelGateway};

use super::client::GeminiClient;

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn send(
        &self,
        tools: &[ToolDefinition],
        history: &[Message],
    ) -> Result<Message, AiError> {
        let body = self.build_request_body(tools, history);
        let url = self.api_url();

        debug!(
            model = %self.config.model,
            messages = history.len(),
            tools = tools.len(),
            "Gemini API request"
        );

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }
}
