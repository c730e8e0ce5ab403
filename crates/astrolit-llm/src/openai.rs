//! OpenAI-compatible chat-completions provider
//!
//! Sends one blocking request per completion with a bounded timeout. There is
//! no retry loop: a failed call is reported immediately so the caller can fall
//! back to another classifier for that pair.
//!
//! # Examples
//!
//! ```no_run
//! use astrolit_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new(
//!     "https://api.openai.com/v1",
//!     "gpt-4.1-mini",
//!     std::env::var("OPENAI_API_KEY").ok(),
//! )
//! .unwrap();
//! ```

use crate::LlmError;
use astrolit_domain::{CompletionProvider, CompletionRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default timeout for completion requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Chat-completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider with the default timeout
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL, without the `/chat/completions` suffix
    /// - `model`: model identifier (e.g., "gpt-4.1-mini")
    /// - `api_key`: bearer credential; `None` makes every call fail as unauthorized
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    /// True when a credential is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

impl CompletionProvider for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Unauthorized("no API key configured".to_string()))?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(self.url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Unauthorized(format!("HTTP {}", status))
                }
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("response has no message content".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
