//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found on the backend
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The model identifier matches no known backend family
    #[error("Unsupported model name: {0}")]
    UnsupportedModel(String),

    /// The backend implied by the model has no usable credential
    #[error("Missing or invalid credential for {backend}: set {key}")]
    MissingCredential { backend: String, key: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether this error comes from configuration rather than a call
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModel(_) | Self::MissingCredential { .. } | Self::ConfigurationError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_display() {
        let err = LLMError::MissingCredential {
            backend: "openai".to_string(),
            key: "OPENAI_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing or invalid credential for openai: set OPENAI_API_KEY"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_call_errors_are_not_configuration() {
        assert!(!LLMError::AuthenticationFailed.is_configuration());
        assert!(!LLMError::RequestFailed("boom".to_string()).is_configuration());
        assert!(LLMError::UnsupportedModel("llama".to_string()).is_configuration());
    }
}
