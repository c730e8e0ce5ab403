//! Astrolit LLM Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `astrolit-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use astrolit_domain::{CompletionProvider, CompletionRequest};
//! use astrolit_llm::MockProvider;
//!
//! let provider = MockProvider::new(r#"{"classification": "NEUTRAL"}"#);
//! let request = CompletionRequest {
//!     system: "classify".to_string(),
//!     user: "abstract".to_string(),
//!     temperature: 0.1,
//!     max_tokens: 500,
//! };
//! assert_eq!(provider.complete(&request).unwrap(), r#"{"classification": "NEUTRAL"}"#);
//! ```

#![warn(missing_docs)]

pub mod openai;

use astrolit_domain::{CompletionProvider, CompletionRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Missing or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid response envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

const ERROR_MARKER: &str = "\u{0}error";

/// Mock completion provider for deterministic testing
///
/// Returns canned responses without any network calls. Keyed responses match
/// when the key is a substring of the user message; the first added key wins.
///
/// # Examples
///
/// ```
/// use astrolit_domain::{CompletionProvider, CompletionRequest};
/// use astrolit_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("rule out", r#"{"classification": "REFUTING"}"#);
///
/// let request = CompletionRequest {
///     system: String::new(),
///     user: "We rule out the companion.".to_string(),
///     temperature: 0.1,
///     max_tokens: 500,
/// };
/// assert!(provider.complete(&request).unwrap().contains("REFUTING"));
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Vec<(String, String)>,
    unavailable: bool,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a mock with a fixed response for every request
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Vec::new(),
            unavailable: false,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock whose every call fails as if the service were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Add a response for user messages containing `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.responses.push((key.into(), response.into()));
    }

    /// Fail requests whose user message contains `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        self.responses.push((key.into(), ERROR_MARKER.to_string()));
    }

    /// Number of completion calls made, shared across clones
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(LlmError::Communication("mock service unavailable".to_string()));
        }

        let matched = self
            .responses
            .iter()
            .find(|(key, _)| request.user.contains(key.as_str()));

        match matched {
            Some((_, response)) if response == ERROR_MARKER => {
                Err(LlmError::Other("Mock error".to_string()))
            }
            Some((_, response)) => Ok(response.clone()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
