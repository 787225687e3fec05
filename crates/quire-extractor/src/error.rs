//! Error types for the Extractor

use thiserror::Error;

/// Errors that end an analysis run
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Invalid windowing or timeout parameters; raised before any oracle call
    #[error("Configuration error: {0}")]
    Config(String),

    /// The oracle failed or answered with something unparseable
    #[error("Oracle call failed on window {window}: {source}")]
    OracleCall {
        /// 0-based index of the window being processed
        window: usize,
        /// Underlying oracle failure
        #[source]
        source: OracleError,
    },

    /// The oracle did not answer within the configured timeout
    #[error("Oracle call timed out on window {window} after {secs}s")]
    Timeout {
        /// 0-based index of the window being processed
        window: usize,
        /// Configured timeout
        secs: u64,
    },

    /// Another run on the same source is still in flight
    #[error("Analysis already running for source '{0}'")]
    RunInProgress(String),
}

impl ExtractorError {
    /// Whether the error came from the oracle call (failure or timeout)
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            ExtractorError::OracleCall { .. } | ExtractorError::Timeout { .. }
        )
    }
}

/// Errors raised at the oracle boundary
#[derive(Error, Debug)]
pub enum OracleError {
    /// The language-model provider failed (transport, HTTP status, ...)
    #[error("LLM error: {0}")]
    Llm(String),

    /// The reply was not a JSON object
    #[error("Invalid oracle response: {0}")]
    InvalidFormat(String),
}
