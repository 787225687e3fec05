//! The oracle port and its language-model adapter

use crate::error::OracleError;
use crate::parser::parse_oracle_reply;
use crate::types::{InferenceHook, InferenceRecord, OracleResponse};
use async_trait::async_trait;
use quire_domain::traits::LlmProvider;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Answers one window's context with a decoded response
///
/// Implementations may be slow or fail; the caller bounds every call with a
/// timeout and cancels by dropping the returned future.
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    /// Query the oracle with a fully built context
    async fn query(&self, context: &str) -> Result<OracleResponse, OracleError>;
}

#[async_trait]
impl<T: ExtractionOracle + ?Sized> ExtractionOracle for Arc<T> {
    async fn query(&self, context: &str) -> Result<OracleResponse, OracleError> {
        (**self).query(context).await
    }
}

/// Oracle backed by an [`LlmProvider`]
///
/// The raw completion is decoded once into an [`OracleResponse`]. Malformed
/// fields are logged and dropped; only a reply that is not a JSON object at
/// all fails the call.
pub struct LlmOracle<L: LlmProvider> {
    provider: Arc<L>,
    hook: Option<InferenceHook>,
}

impl<L: LlmProvider> LlmOracle<L> {
    /// Wrap a provider
    pub fn new(provider: L) -> Self {
        Self {
            provider: Arc::new(provider),
            hook: None,
        }
    }

    /// Receive an [`InferenceRecord`] for every provider call
    pub fn with_inference_hook(mut self, hook: InferenceHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    fn record(&self, request: &str, outcome: Result<&str, String>, started: Instant) {
        let Some(hook) = &self.hook else {
            return;
        };

        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let (response, error) = match outcome {
            Ok(text) => (Some(text.to_string()), None),
            Err(message) => (None, Some(message)),
        };

        hook(&InferenceRecord {
            request: request.to_string(),
            response,
            error,
            model: self.provider.model_name().to_string(),
            created_at,
            latency_ms: started.elapsed().as_millis() as u64,
        });
    }
}

#[async_trait]
impl<L: LlmProvider> ExtractionOracle for LlmOracle<L> {
    async fn query(&self, context: &str) -> Result<OracleResponse, OracleError> {
        let started = Instant::now();
        let reply = match self.provider.generate(context).await {
            Ok(reply) => {
                self.record(context, Ok(&reply), started);
                reply
            }
            Err(e) => {
                self.record(context, Err(e.to_string()), started);
                return Err(OracleError::Llm(e.to_string()));
            }
        };

        debug!(
            "Oracle reply: {} chars in {}ms",
            reply.len(),
            started.elapsed().as_millis()
        );

        let parsed = parse_oracle_reply(&reply)?;
        for field in &parsed.malformed {
            warn!(location = %field.location, "Skipping malformed oracle field: {}", field.reason);
        }

        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_domain::{MultiField, ScalarField};
    use quire_llm::MockProvider;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_llm_oracle_decodes_reply() {
        let provider = MockProvider::default().with_response(
            r#"{"patient": {"name": "Bella", "possibleBreed": ["Beagle"]},
                "documents": [{"title": "Lab Report", "start_line": 1, "end_line": 45}]}"#,
        );
        let oracle = LlmOracle::new(provider);

        let response = oracle.query("context").await.unwrap();
        let subject = response.subject.unwrap();
        assert_eq!(subject.scalar(ScalarField::Name), Some("Bella"));
        assert_eq!(
            subject.candidates(MultiField::PossibleBreed).collect::<Vec<_>>(),
            vec!["Beagle"]
        );
        assert_eq!(response.documents.len(), 1);
        assert_eq!(oracle.provider().prompts(), vec!["context".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_entries_do_not_fail_the_call() {
        let provider = MockProvider::default().with_response(
            r#"{"documents": [{"title": "Good", "start_line": 3, "end_line": 9},
                              {"title": "Bad", "start_line": "three"}]}"#,
        );
        let response = LlmOracle::new(provider).query("ctx").await.unwrap();
        assert_eq!(response.documents.len(), 1);
        assert_eq!(response.documents[0].title, "Good");
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_llm_error() {
        let provider = MockProvider::default().with_error("connection refused");
        let result = LlmOracle::new(provider).query("ctx").await;
        assert!(matches!(result, Err(OracleError::Llm(msg)) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_invalid_format() {
        let provider = MockProvider::default().with_response("I could not find any documents.");
        let result = LlmOracle::new(provider).query("ctx").await;
        assert!(matches!(result, Err(OracleError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_inference_hook_sees_every_call() {
        let records: Arc<Mutex<Vec<InferenceRecord>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        let provider = MockProvider::default()
            .with_response(r#"{"documents": []}"#)
            .with_error("boom");
        let oracle = LlmOracle::new(provider).with_inference_hook(Arc::new(move |r| {
            sink.lock().unwrap().push(r.clone());
        }));

        oracle.query("first").await.unwrap();
        oracle.query("second").await.unwrap_err();

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].request, "first");
        assert_eq!(records[0].response.as_deref(), Some(r#"{"documents": []}"#));
        assert_eq!(records[0].model, "mock");
        assert!(records[1].response.is_none());
        assert!(records[1].error.as_deref().unwrap().contains("boom"));
    }
}
