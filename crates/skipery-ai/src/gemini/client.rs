//! Gemini API client struct, request building, and response parsing.

use serde_json::{json, Map, Value};

use crate::message::{Author, Message, ToolCall};
use crate::tools::{to_gemini_tool, ToolDefinition};
use crate::AiError;

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(
        &self,
        tools: &[ToolDefinition],
        history: &[Message],
    ) -> Value {
        let mut contents = Vec::new();
        let mut system_parts = Vec::new();

        for msg in history {
            match msg.author {
                Author::System => system_parts.push(json!({ "text": msg.text })),
                Author::User if msg.is_tool_result() => {
                    let parts: Vec<_> = msg
                        .tool_results
                        .iter()
                        .map(|result| {
                            json!({
                                "functionResponse": {
                                    "name": result.name,
                                    "response": response_object(&result.payload),
                                }
                            })
                        })
                        .collect();
                    contents.push(json!({ "role": "user", "parts": parts }));
                }
                Author::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{ "text": msg.text }]
                    }));
                }
                Author::Model => {
                    let mut parts = Vec::new();
                    if !msg.text.is_empty() {
                        parts.push(json!({ "text": msg.text }));
                    }
                    for call in &msg.tool_calls {
                        parts.push(json!({
                            "functionCall": { "name": call.name, "args": call.args }
                        }));
                    }
                    if parts.is_empty() {
                        parts.push(json!({ "text": "" }));
                    }
                    contents.push(json!({ "role": "model", "parts": parts }));
                }
            }
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_gemini_tool).collect();
            body["tools"] = json!([{
                "functionDeclarations": tool_defs
            }]);
        }

        body
    }

    /// Parse a Gemini response into a model message.
    pub(crate) fn parse_response(&self, json: Value) -> Result<Message, AiError> {
        let first = json["candidates"]
            .as_array()
            .and_then(|candidates| candidates.first());

        let Some(first) = first else {
            if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
                return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
            }
            return Err(AiError::ParseError("no candidates in response".to_string()));
        };

        let parts = first["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in &parts {
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
            }
            if let Some(fc) = part.get("functionCall") {
                let name = fc["name"]
                    .as_str()
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| AiError::ParseError("functionCall without name".into()))?;
                let args = match &fc["args"] {
                    Value::Object(map) => map.clone(),
                    _ => Map::new(),
                };
                tool_calls.push(ToolCall::new(name, args));
            }
        }

        Ok(Message::model(text, tool_calls))
    }
}

/// `functionResponse.response` must be an object.
fn response_object(payload: &Value) -> Value {
    match payload {
        Value::Object(_) => payload.clone(),
        other => json!({ "result": other }),
    }
}
