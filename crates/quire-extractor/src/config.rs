//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of lines per window
pub const DEFAULT_WINDOW_SIZE: usize = 300;

/// Default number of lines shared by consecutive windows
pub const DEFAULT_OVERLAP_SIZE: usize = 100;

/// Default oracle call timeout (seconds)
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 120;

/// Configuration for an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Lines per window
    pub window_size: usize,

    /// Lines shared by consecutive windows
    pub overlap_size: usize,

    /// Maximum time for a single oracle call (seconds)
    pub oracle_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the oracle timeout as a Duration
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Distance between the starts of consecutive windows
    pub fn step_size(&self) -> usize {
        self.window_size.saturating_sub(self.overlap_size)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        validate_windowing(self.window_size, self.overlap_size)?;
        if self.oracle_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "oracle_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check `window_size > overlap_size > 0`
pub(crate) fn validate_windowing(
    window_size: usize,
    overlap_size: usize,
) -> Result<(), ExtractorError> {
    if overlap_size == 0 {
        return Err(ExtractorError::Config(
            "overlap_size must be greater than 0".to_string(),
        ));
    }
    if window_size <= overlap_size {
        return Err(ExtractorError::Config(format!(
            "window_size ({}) must be greater than overlap_size ({})",
            window_size, overlap_size
        )));
    }
    Ok(())
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            overlap_size: DEFAULT_OVERLAP_SIZE,
            oracle_timeout_secs: DEFAULT_ORACLE_TIMEOUT_SECS,
        }
    }
}

impl ExtractorConfig {
    /// Compact preset: smaller windows and a shorter timeout, for small models
    pub fn compact() -> Self {
        Self {
            window_size: 150,
            overlap_size: 50,
            oracle_timeout_secs: 60,
        }
    }

    /// Wide preset: larger windows and a longer timeout, for long-context models
    pub fn wide() -> Self {
        Self {
            window_size: 600,
            overlap_size: 150,
            oracle_timeout_secs: 300,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
