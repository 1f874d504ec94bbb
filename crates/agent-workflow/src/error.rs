//! Error types for pipeline runs

use crate::Stage;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that stop a pipeline run
///
/// Per-symbol data and call failures never surface here; they are folded
/// into the state as error records and sentinel strings.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// No symbols to analyze
    #[error("Symbol list is empty")]
    EmptySymbols,

    /// A per-symbol list does not have one slot per symbol
    #[error("{field} has {actual} entries but there are {expected} symbols")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A style tag names no registered template
    #[error("Unknown analysis style '{0}'")]
    UnknownStyle(String),

    /// The state was built for a different model than the workflow's client
    #[error("State requests model '{requested}' but the workflow was built for '{configured}'")]
    ModelMismatch { requested: String, configured: String },

    /// A stage ran before its inputs were populated
    #[error("Stage {stage} requires {field}, which is not populated")]
    MissingStageOutput { stage: Stage, field: &'static str },

    /// Workflow assembly error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Stock component error
    #[error(transparent)]
    Stock(#[from] agent_stock::StockError),

    /// Template catalog error
    #[error(transparent)]
    Prompt(#[from] agent_prompt::PromptError),

    /// LLM backend error
    #[error(transparent)]
    Llm(#[from] agent_llm::LLMError),
}
