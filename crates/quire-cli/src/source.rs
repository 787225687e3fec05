//! Reading input files into line sequences.

use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;

/// Read `path` as UTF-8 (lossily) and split it into lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| CliError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes)))
}

/// Split on `\n`, dropping one trailing `\r` per line.
///
/// A final terminator does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let body = text.strip_suffix('\n').unwrap_or(text);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
