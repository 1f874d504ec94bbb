//! Error types for stock analysis operations

use thiserror::Error;

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// History file could not be read or written
    #[error("History store error at {path}: {source}")]
    HistoryIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Prompt lookup or rendering failed
    #[error(transparent)]
    Prompt(#[from] agent_prompt::PromptError),

    /// LLM backend selection or call failed
    #[error(transparent)]
    Llm(#[from] agent_llm::LLMError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StockError {
    /// Whether the error is a configuration problem rather than a runtime failure
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::ConfigError(_) => true,
            Self::Llm(err) => err.is_configuration(),
            Self::Prompt(err) => err.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
