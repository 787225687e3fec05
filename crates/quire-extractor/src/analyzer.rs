//! Analysis orchestration over a full line sequence

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::merge::merge;
use crate::oracle::ExtractionOracle;
use crate::prompt::build_context;
use crate::windowing::WindowSegmenter;
use quire_domain::{AccumulatedResult, RunId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};

/// Drives one oracle call per window and folds every reply into the result
///
/// Windows are processed strictly in order; window `k + 1` is only built
/// once window `k` has been merged. Any oracle failure or timeout aborts the
/// run and discards the partial result.
pub struct Analyzer<O: ExtractionOracle> {
    oracle: O,
    config: ExtractorConfig,
    active_sources: Arc<Mutex<HashSet<String>>>,
}

impl<O: ExtractionOracle> Analyzer<O> {
    /// Create an analyzer
    pub fn new(oracle: O, config: ExtractorConfig) -> Self {
        Self {
            oracle,
            config,
            active_sources: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Analyze `lines`, returning the profile and every accepted document
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::Config`] before any oracle call if the config is invalid
    /// - [`ExtractorError::OracleCall`] if the oracle fails or answers with non-JSON
    /// - [`ExtractorError::Timeout`] if one call exceeds the configured timeout
    pub async fn analyze(&self, lines: &[String]) -> Result<AccumulatedResult, ExtractorError> {
        let run_id = RunId::new();
        self.run(lines)
            .instrument(info_span!("analysis", %run_id, source = tracing::field::Empty))
            .await
    }

    /// Analyze `lines` on behalf of `source_id`
    ///
    /// At most one run per source is in flight; a concurrent call for the same
    /// source fails immediately with [`ExtractorError::RunInProgress`]. The
    /// slot is released when the run ends, fails, or is dropped.
    pub async fn analyze_source(
        &self,
        source_id: &str,
        lines: &[String],
    ) -> Result<AccumulatedResult, ExtractorError> {
        let _guard = RunGuard::acquire(&self.active_sources, source_id)?;
        let run_id = RunId::new();
        self.run(lines)
            .instrument(info_span!("analysis", %run_id, source = %source_id))
            .await
    }

    async fn run(&self, lines: &[String]) -> Result<AccumulatedResult, ExtractorError> {
        self.config.validate()?;
        let segmenter = WindowSegmenter::from_config(&self.config)?;
        let windows = segmenter.segment(lines);

        info!(
            "Starting analysis: {} lines, {} windows (size {}, overlap {})",
            lines.len(),
            windows.len(),
            self.config.window_size,
            self.config.overlap_size
        );

        let mut accumulated = AccumulatedResult::new();
        let secs = self.config.oracle_timeout_secs;

        for (index, window) in windows.iter().enumerate() {
            let context = build_context(window, &accumulated);
            debug!(
                window = index,
                start = window.start_index,
                end = window.end_index(),
                "Context length: {} chars",
                context.len()
            );

            let response = timeout(self.config.oracle_timeout(), self.oracle.query(&context))
                .await
                .map_err(|_| ExtractorError::Timeout { window: index, secs })?
                .map_err(|source| ExtractorError::OracleCall {
                    window: index,
                    source,
                })?;

            let outcome = merge(&mut accumulated, response, window);
            debug!(
                window = index,
                accepted = outcome.accepted,
                duplicates = outcome.duplicates,
                profile_updates = outcome.profile_updates,
                "Merged window"
            );
        }

        for (first, second) in accumulated.overlapping_extracts() {
            let a = &accumulated.extracts[first];
            let b = &accumulated.extracts[second];
            warn!(
                "Accepted documents overlap: '{}' (lines {}-{}) and '{}' (lines {}-{})",
                a.title, a.start_line, a.end_line, b.title, b.start_line, b.end_line
            );
        }

        info!(
            "Analysis complete: {} documents, profile {}",
            accumulated.extracts.len(),
            if accumulated.profile.is_empty() {
                "empty"
            } else {
                "populated"
            }
        );

        Ok(accumulated)
    }
}

/// Holds a source's run slot until dropped
struct RunGuard {
    active: Arc<Mutex<HashSet<String>>>,
    source_id: String,
}

impl RunGuard {
    fn acquire(
        active: &Arc<Mutex<HashSet<String>>>,
        source_id: &str,
    ) -> Result<Self, ExtractorError> {
        if !lock(active).insert(source_id.to_string()) {
            return Err(ExtractorError::RunInProgress(source_id.to_string()));
        }
        Ok(Self {
            active: Arc::clone(active),
            source_id: source_id.to_string(),
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        lock(&self.active).remove(&self.source_id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
