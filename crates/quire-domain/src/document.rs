//! Accepted document extracts

use serde::Serialize;

/// One accepted document boundary with its absolute line range
///
/// `start_line` and `end_line` are absolute line numbers in the source file
/// (1-based), independent of the window the document was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentExtract {
    /// Title reported for the document
    pub title: String,

    /// Absolute first line
    pub start_line: i64,

    /// Absolute last line
    pub end_line: i64,

    /// `end_line - start_line`
    pub line_count: i64,

    /// Text of the document, sliced from the window it was found in
    pub window_lines: Vec<String>,
}

impl DocumentExtract {
    /// Create an extract, deriving `line_count` from the range
    pub fn new(
        title: impl Into<String>,
        start_line: i64,
        end_line: i64,
        window_lines: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_line,
            end_line,
            line_count: end_line - start_line,
            window_lines,
        }
    }

    /// Whether the inclusive ranges of two extracts intersect
    pub fn overlaps(&self, other: &DocumentExtract) -> bool {
        self.start_line <= other.end_line && other.start_line <= self.end_line
    }
}
