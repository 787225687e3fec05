//! Quire LLM Provider Layer
//!
//! Pluggable implementations of the `LlmProvider` trait from `quire-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted provider for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use quire_llm::MockProvider;
//! use quire_domain::traits::LlmProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new(r#"{"documents": []}"#);
//! let reply = provider.generate("any prompt").await.unwrap();
//! assert_eq!(reply, r#"{"documents": []}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use quire_domain::traits::LlmProvider;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (missing key, bad URL, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply of a [`MockProvider`]
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
    Delayed(Duration, String),
}

/// Mock LLM provider for deterministic testing
///
/// Replies are scripted in call order: each call consumes the next queued
/// reply, and once the queue is empty every call gets the default response.
/// Every prompt received is recorded so tests can inspect what was sent.
///
/// # Examples
///
/// ```
/// use quire_llm::MockProvider;
///
/// let provider = MockProvider::new("fallback")
///     .with_response("first")
///     .with_error("second call fails");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    scripted: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fallback response for unscripted calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a reply; queued replies are consumed in call order
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(MockReply::Text(response.into()));
        self
    }

    /// Queue a failing call
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Error(message.into()));
        self
    }

    /// Queue a reply that only arrives after `delay`
    pub fn with_delayed_response(self, delay: Duration, response: impl Into<String>) -> Self {
        self.push(MockReply::Delayed(delay, response.into()));
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    fn push(&self, reply: MockReply) {
        lock(&self.scripted).push_back(reply);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"documents": []}"#)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        let next = lock(&self.scripted).pop_front();
        match next {
            Some(MockReply::Text(response)) => Ok(response),
            Some(MockReply::Error(message)) => Err(LlmError::Other(message)),
            Some(MockReply::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

// A panicking test must not cascade into every other user of the mock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
