//! Sliding-window segmentation of the input line sequence

use crate::config::{validate_windowing, ExtractorConfig};
use crate::error::ExtractorError;
use quire_domain::Window;
use std::ops::Range;

/// Cuts a line sequence into overlapping windows
///
/// Windows start at `0, step, 2 * step, ...` with `step = window_size - overlap_size`
/// and end at `min(start + window_size, len)`, stopping at the first window
/// that reaches the end of the input. Every index of the input lands in at
/// least one window, and consecutive windows share exactly `overlap_size` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSegmenter {
    window_size: usize,
    overlap_size: usize,
}

impl WindowSegmenter {
    /// Create a segmenter, rejecting parameters that would never advance
    pub fn new(window_size: usize, overlap_size: usize) -> Result<Self, ExtractorError> {
        validate_windowing(window_size, overlap_size)?;
        Ok(Self {
            window_size,
            overlap_size,
        })
    }

    /// Create a segmenter from the windowing fields of a config
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::new(config.window_size, config.overlap_size)
    }

    /// Distance between consecutive window starts
    pub fn step_size(&self) -> usize {
        self.window_size - self.overlap_size
    }

    /// Index ranges the windows of a `len`-line sequence would cover
    ///
    /// The window that reaches `len` is the last one; a further start would
    /// only repeat lines already covered.
    pub fn plan(&self, len: usize) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;

        while start < len {
            let end = start.saturating_add(self.window_size).min(len);
            ranges.push(start..end);
            if end == len {
                break;
            }
            start += self.step_size();
        }

        ranges
    }

    /// Segment the given lines into owned windows
    pub fn segment(&self, lines: &[String]) -> Vec<Window> {
        self.plan(lines.len())
            .into_iter()
            .map(|range| Window::new(range.start, &lines[range]))
            .collect()
    }
}

impl Default for WindowSegmenter {
    fn default() -> Self {
        Self {
            window_size: crate::config::DEFAULT_WINDOW_SIZE,
            overlap_size: crate::config::DEFAULT_OVERLAP_SIZE,
        }
    }
}

/// Segment `lines` into windows of `window_size` lines sharing `overlap_size` lines
///
/// # Errors
///
/// Returns [`ExtractorError::Config`] unless `window_size > overlap_size > 0`.
pub fn segment(
    lines: &[String],
    window_size: usize,
    overlap_size: usize,
) -> Result<Vec<Window>, ExtractorError> {
    Ok(WindowSegmenter::new(window_size, overlap_size)?.segment(lines))
}
