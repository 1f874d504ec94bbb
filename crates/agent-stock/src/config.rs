//! Configuration for stock analysis operations

use crate::error::{Result, StockError};
use agent_utils::ConfigSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the per-symbol history file
pub const DEFAULT_HISTORY_FILE: &str = "data/stock_history.json";

/// Configuration keys read by [`StockConfig::from_source`]
pub mod keys {
    pub const HISTORY_FILE: &str = "STOCK_HISTORY_FILE";
    pub const TEMPLATES_DIR: &str = "PROMPT_TEMPLATES_DIR";
    pub const MAX_TOKENS: &str = "ANALYSIS_MAX_TOKENS";
    pub const TEMPERATURE: &str = "ANALYSIS_TEMPERATURE";
    pub const REQUEST_TIMEOUT: &str = "LLM_TIMEOUT_SECS";
}

/// Configuration for stock analysis operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConfig {
    /// JSON file holding the latest history summary per symbol
    pub history_file: PathBuf,

    /// Optional directory of `*.jinja` templates overriding or extending the built-ins
    pub templates_dir: Option<PathBuf>,

    /// Output bound for each LLM call
    pub max_tokens: usize,

    /// Sampling temperature for each LLM call
    pub temperature: f32,

    /// HTTP timeout for LLM calls, in seconds
    pub request_timeout_secs: u64,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            templates_dir: None,
            max_tokens: 1000,
            temperature: 0.3,
            request_timeout_secs: 120,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Read overrides from a key/value source, falling back to defaults
    ///
    /// Unparsable numeric values are configuration errors.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(path) = source.get_non_empty(keys::HISTORY_FILE) {
            builder = builder.history_file(path);
        }
        if let Some(dir) = source.get_non_empty(keys::TEMPLATES_DIR) {
            builder = builder.templates_dir(dir);
        }
        if let Some(value) = source.get_non_empty(keys::MAX_TOKENS) {
            builder = builder.max_tokens(parse_key(keys::MAX_TOKENS, &value)?);
        }
        if let Some(value) = source.get_non_empty(keys::TEMPERATURE) {
            builder = builder.temperature(parse_key(keys::TEMPERATURE, &value)?);
        }
        if let Some(value) = source.get_non_empty(keys::REQUEST_TIMEOUT) {
            builder = builder.request_timeout_secs(parse_key(keys::REQUEST_TIMEOUT, &value)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(StockError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(StockError::ConfigError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(StockError::ConfigError(
                "request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_key<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| StockError::ConfigError(format!("invalid {key} '{value}': {e}")))
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    history_file: Option<PathBuf>,
    templates_dir: Option<PathBuf>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    request_timeout_secs: Option<u64>,
}

impl StockConfigBuilder {
    /// Set the history file path
    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Set the template override directory
    pub fn templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    /// Set the per-call output bound
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the LLM request timeout in seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            history_file: self.history_file.unwrap_or(defaults.history_file),
            templates_dir: self.templates_dir.or(defaults.templates_dir),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        };

        config.validate()?;
        Ok(config)
    }
}
