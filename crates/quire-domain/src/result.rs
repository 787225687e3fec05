//! Running state of an analysis run

use crate::{DocumentExtract, SubjectProfile};
use serde::Serialize;

/// Profile plus accepted extracts, threaded through every window of a run
///
/// Extracts are kept in append order. Once accepted an extract is never
/// removed or altered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatedResult {
    /// Consolidated subject profile
    pub profile: SubjectProfile,

    /// Accepted document extracts, append order
    pub extracts: Vec<DocumentExtract>,
}

impl AccumulatedResult {
    /// Create an empty result for a new run
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an extract starting on `start_line` was already accepted
    pub fn has_start_line(&self, start_line: i64) -> bool {
        self.extracts.iter().any(|e| e.start_line == start_line)
    }

    /// Append an accepted extract
    pub fn push_extract(&mut self, extract: DocumentExtract) {
        self.extracts.push(extract);
    }

    /// Pairs of accepted extracts (by index) whose ranges intersect
    ///
    /// Purely diagnostic; the accumulated list is left untouched.
    pub fn overlapping_extracts(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.extracts.iter().enumerate() {
            for (j, b) in self.extracts.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
