//! Chat completions client for the Groq OpenAI-compatible API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::Config;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2500;

/// Ways a completion request can fail.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("completion response has no message content")]
    MissingContent,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Completion API handle. Cheap to clone; shares the underlying HTTP pool.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(
        http: Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(
            http,
            &config.groq_api_url,
            &config.groq_api_key,
            &config.groq_model,
            config.completion_timeout(),
        )
    }

    /// Send a single user-role prompt and return the first choice's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        info!(
            model = %self.model,
            prompt_length = prompt.len(),
            timeout_seconds = self.timeout.as_secs_f64(),
            "completion_request_starting"
        );

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status_code = status.as_u16(),
                body_preview = %preview(&body),
                "completion_api_error"
            );
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: preview(&body).to_string(),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::MissingContent)?;

        info!(
            status_code = status.as_u16(),
            content_length = content.len(),
            "completion_request_complete"
        );

        Ok(content)
    }
}

/// First 200 bytes of a response body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "mixtral-8x7b-32768",
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "mixtral-8x7b-32768");
        assert_eq!(value["messages"][0], json!({"role": "user", "content": "hello"}));
        assert_eq!(value["max_tokens"], 2500);
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_response_without_choices_parses() {
        let parsed: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn test_preview_respects_char_boundary() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= 200);
        assert!(body.starts_with(cut));
    }
}
