//! Windows over the input line sequence

use serde::Serialize;

/// A bounded, contiguous slice of the input line sequence
///
/// `lines` covers `[start_index, start_index + lines.len())` of the source
/// sequence (0-based). A window owns its lines: nothing done to a window
/// can reach back into the sequence it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    /// 0-based index of the first line in the source sequence
    pub start_index: usize,

    /// Owned copy of the lines in this window
    pub lines: Vec<String>,
}

impl Window {
    /// Create a window by copying `lines` starting at `start_index`
    pub fn new(start_index: usize, lines: &[String]) -> Self {
        Self {
            start_index,
            lines: lines.to_vec(),
        }
    }

    /// Exclusive 0-based end index in the source sequence
    pub fn end_index(&self) -> usize {
        self.start_index + self.lines.len()
    }

    /// Number of lines in the window
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the window holds no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Absolute, 1-based line number for a window-local offset
    pub fn absolute_line_number(&self, offset: usize) -> usize {
        self.start_index + offset + 1
    }

    /// Lines rendered as `"{absolute_line}: {text}"`, one per entry
    pub fn numbered_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(|(offset, line)| format!("{}: {}", self.absolute_line_number(offset), line))
    }

    /// Slice the window by absolute line numbers
    ///
    /// The range `[start_line, end_line)` is shifted by `start_index` into
    /// window-local offsets and clamped to the window bounds. Ranges that
    /// fall entirely outside the window yield an empty slice.
    pub fn slice_absolute(&self, start_line: i64, end_line: i64) -> Vec<String> {
        let len = self.lines.len() as i64;
        let base = self.start_index as i64;

        let lo = (start_line - base).clamp(0, len);
        let hi = (end_line - base).clamp(lo, len);

        self.lines[lo as usize..hi as usize].to_vec()
    }
}
