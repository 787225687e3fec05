//! JSON-lines transcript of model calls.

use crate::error::{CliError, Result};
use quire_extractor::{InferenceHook, InferenceRecord};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Appends one JSON object per model call to a file.
#[derive(Debug, Clone)]
pub struct TranscriptWriter {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl TranscriptWriter {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                CliError::Config(format!("Cannot open transcript {}: {}", path.display(), e))
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Append one record.
    pub fn append(&self, record: &InferenceRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = self
            .file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Turn the writer into an inference hook.
    ///
    /// Write failures are logged; they never interrupt the analysis.
    pub fn into_hook(self) -> InferenceHook {
        Arc::new(move |record| {
            if let Err(e) = self.append(record) {
                warn!("Failed to write transcript {}: {}", self.path.display(), e);
            }
        })
    }
}
