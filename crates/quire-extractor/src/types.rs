//! Request and response types at the oracle boundary

use quire_domain::{MultiField, ScalarField};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Decoded oracle reply for one window
///
/// Every field is optional: whatever the oracle left out or got wrong was
/// already dropped while decoding, so merging never re-checks shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OracleResponse {
    /// Subject metadata proposed for this window
    pub subject: Option<SubjectCandidate>,

    /// Complete documents found in this window, oracle order
    pub documents: Vec<DocumentCandidate>,
}

/// Subject fields proposed by the oracle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectCandidate {
    scalars: Vec<(ScalarField, String)>,
    multi: Vec<(MultiField, String)>,
}

impl SubjectCandidate {
    /// Create an empty candidate
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SubjectCandidate::set_scalar`]
    pub fn with_scalar(mut self, field: ScalarField, value: impl Into<String>) -> Self {
        self.set_scalar(field, value);
        self
    }

    /// Builder form of [`SubjectCandidate::push_candidate`]
    pub fn with_candidate(mut self, field: MultiField, value: impl Into<String>) -> Self {
        self.push_candidate(field, value);
        self
    }

    /// Propose a scalar value; a later proposal for the same field replaces it
    pub fn set_scalar(&mut self, field: ScalarField, value: impl Into<String>) {
        let value = value.into();
        match self.scalars.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = value,
            None => self.scalars.push((field, value)),
        }
    }

    /// Propose a value for a multi-valued field
    pub fn push_candidate(&mut self, field: MultiField, value: impl Into<String>) {
        self.multi.push((field, value.into()));
    }

    /// Proposed value of a scalar field
    pub fn scalar(&self, field: ScalarField) -> Option<&str> {
        self.scalars
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Proposed values of a multi-valued field, oracle order
    pub fn candidates(&self, field: MultiField) -> impl Iterator<Item = &str> {
        self.multi
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Whether nothing was proposed
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.multi.is_empty()
    }
}

/// A document boundary proposed by the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCandidate {
    /// Document title
    pub title: String,

    /// Absolute first line (1-based)
    pub start_line: i64,

    /// Absolute last line
    pub end_line: i64,
}

impl DocumentCandidate {
    /// Create a candidate
    pub fn new(title: impl Into<String>, start_line: i64, end_line: i64) -> Self {
        Self {
            title: title.into(),
            start_line,
            end_line,
        }
    }
}

/// A field or entry of an oracle reply that could not be used
///
/// Never fatal: the offending piece is skipped and the rest of the reply
/// is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedField {
    /// Where in the reply, e.g. `documents[2].start_line`
    pub location: String,

    /// What was wrong with it
    pub reason: String,
}

impl MalformedField {
    pub(crate) fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MalformedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.reason)
    }
}

/// What one merge step changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Document candidates appended to the result
    pub accepted: usize,

    /// Document candidates dropped because their start line was already taken
    pub duplicates: usize,

    /// Profile fields whose value changed or grew
    pub profile_updates: usize,
}

/// One provider call, as handed to an inference hook
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRecord {
    /// Prompt sent to the provider
    pub request: String,

    /// Raw completion, when the call succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Failure message, when the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Model that served the call
    pub model: String,

    /// Seconds since the Unix epoch when the call completed
    pub created_at: u64,

    /// Wall time of the call in milliseconds
    pub latency_ms: u64,
}

/// Callback receiving every [`InferenceRecord`]
pub type InferenceHook = Arc<dyn Fn(&InferenceRecord) + Send + Sync>;
