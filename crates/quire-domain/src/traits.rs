//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;

/// Trait for language-model provider operations
///
/// Implemented by the infrastructure layer (quire-llm). A provider turns one
/// prompt into one raw completion; decoding the completion is the caller's job.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for provider operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model answering requests, for transcripts and logs
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct EchoError;

    impl fmt::Display for EchoError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("echo failed")
        }
    }

    impl std::error::Error for EchoError {}

    struct Echo;

    #[async_trait]
    impl LlmProvider for Echo {
        type Error = EchoError;

        async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
            if prompt.is_empty() {
                return Err(EchoError);
            }
            Ok(prompt.to_uppercase())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_provider_trait_is_usable_generically() {
        async fn call<P: LlmProvider>(provider: &P, prompt: &str) -> Result<String, P::Error> {
            provider.generate(prompt).await
        }

        assert_eq!(call(&Echo, "hi").await.unwrap(), "HI");
        assert!(call(&Echo, "").await.is_err());
        assert_eq!(Echo.model_name(), "echo");
    }
}
