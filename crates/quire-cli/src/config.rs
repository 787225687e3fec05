//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use quire_extractor::ExtractorConfig;
use quire_llm::openai::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use quire_llm::OpenAiProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the provider API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model
pub const MODEL_VAR: &str = "OPENAI_MODEL_VERSION";

/// Environment variable overriding the provider base URL
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Windowing and timeout parameters
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Language-model provider
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Provider connection settings.
///
/// The API key is deliberately absent: it is only ever read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Attempts per request, including the first
    pub max_retries: u32,

    /// HTTP timeout per attempt (seconds)
    pub request_timeout_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".quire").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.extractor.validate().map_err(|e| {
            CliError::Config(format!("{} in {}", e, path.display()))
        })?;
        config
            .provider
            .validate()
            .map_err(|e| CliError::Config(format!("{} in {}", e, path.display())))?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `OPENAI_MODEL_VERSION` and `OPENAI_BASE_URL` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply provider overrides from `lookup`; empty values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = non_empty(MODEL_VAR) {
            self.provider.model = model;
        }
        if let Some(url) = non_empty(BASE_URL_VAR) {
            self.provider.base_url = url;
        }
    }
}

impl ProviderSettings {
    /// Reject settings no request could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "provider.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(CliError::Config(
                "provider.max_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a provider from these settings and the given API key.
    pub fn build(&self, api_key: &str) -> Result<OpenAiProvider> {
        self.validate()?;
        let provider = OpenAiProvider::with_timeout(
            api_key,
            &self.model,
            Duration::from_secs(self.request_timeout_secs),
        )?;
        Ok(provider
            .with_base_url(&self.base_url)
            .with_max_retries(self.max_retries))
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Read the API key from the environment.
pub fn api_key() -> Result<String> {
    std::env::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| CliError::Config(format!("{} is not set", API_KEY_VAR)))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
