//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur during prompt operations
#[derive(Error, Debug)]
pub enum PromptError {
    /// No template registered under this name
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// A placeholder in the template has no matching field
    #[error("Missing field for template '{name}': {detail}")]
    MissingField { name: String, detail: String },

    /// Template parsing failed
    #[error("Failed to parse template '{name}': {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Template rendering failed for another reason
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    /// File loading error
    #[error("Failed to load template file '{path}': {detail}")]
    FileLoadError { path: String, detail: String },
}

impl PromptError {
    /// Whether the failure is an unknown template name
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound(_))
    }

    /// Whether the failure is a placeholder without a value
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}
