//! Quire Extractor
//!
//! Finds document boundaries and subject metadata in long line sequences by
//! asking an oracle about one overlapping window at a time.
//!
//! # Overview
//!
//! Input that is far larger than the oracle can read at once is cut into
//! windows of `window_size` lines, consecutive windows sharing
//! `overlap_size` lines. Every window is sent with its lines numbered by
//! absolute position, together with what earlier windows already found.
//! Each reply is merged into a single accumulated result: the profile grows,
//! and a document is accepted unless one was already accepted at the same
//! start line.
//!
//! # Architecture
//!
//! ```text
//! lines → WindowSegmenter → ContextBuilder → ExtractionOracle → merge → AccumulatedResult
//!                                 ↑                                        │
//!                                 └────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use quire_extractor::{Analyzer, ExtractorConfig, LlmOracle};
//! use quire_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = LlmOracle::new(MockProvider::default());
//! let analyzer = Analyzer::new(oracle, ExtractorConfig::default());
//!
//! let lines: Vec<String> = std::fs::read_to_string("records.txt")?
//!     .lines()
//!     .map(str::to_string)
//!     .collect();
//!
//! let result = analyzer.analyze(&lines).await?;
//! for extract in &result.extracts {
//!     println!("{} ({}-{})", extract.title, extract.start_line, extract.end_line);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod merge;
mod oracle;
mod parser;
mod prompt;
mod types;
mod windowing;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use config::{
    ExtractorConfig, DEFAULT_ORACLE_TIMEOUT_SECS, DEFAULT_OVERLAP_SIZE, DEFAULT_WINDOW_SIZE,
};
pub use error::{ExtractorError, OracleError};
pub use merge::{admit_documents, merge, merge_profile};
pub use oracle::{ExtractionOracle, LlmOracle};
pub use parser::{parse_oracle_reply, ParsedReply};
pub use prompt::{build_context, ContextBuilder};
pub use types::{
    DocumentCandidate, InferenceHook, InferenceRecord, MalformedField, MergeOutcome,
    OracleResponse, SubjectCandidate,
};
pub use windowing::{segment, WindowSegmenter};
