//! Backend selection from a model identifier
//!
//! A model identifier such as `gpt-4o-mini` or `deepseek-chat` implies which
//! backend serves it. The mapping is an explicit prefix table resolved once,
//! when the analysis client is constructed; credentials and endpoint bases
//! are read from a [`ConfigSource`].

use crate::{LLMError, Result};
use agent_utils::ConfigSource;
use std::fmt;

/// Backends the pipeline knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// OpenAI (or an OpenAI proxy)
    OpenAi,
    /// DeepSeek's OpenAI-compatible API
    DeepSeek,
}

/// Identifier prefix to backend, checked in order, case-insensitive
const MODEL_PREFIXES: &[(&str, BackendKind)] = &[
    ("gpt", BackendKind::OpenAi),
    ("deepseek", BackendKind::DeepSeek),
];

/// Marker OpenAI puts in front of fine-tuned model identifiers
const FINE_TUNE_PREFIX: &str = "ft:";

/// Placeholder values shipped in generated `.env` files
const PLACEHOLDER_PREFIX: &str = "your_";

impl BackendKind {
    /// Resolve the backend for a model identifier
    ///
    /// A leading `ft:` is skipped, so `ft:gpt-4o-mini:org::id` resolves to
    /// OpenAI.
    pub fn from_model(model: &str) -> Result<Self> {
        let lowered = model.trim().to_ascii_lowercase();
        let base = lowered.strip_prefix(FINE_TUNE_PREFIX).unwrap_or(lowered.as_str());
        MODEL_PREFIXES
            .iter()
            .find(|(prefix, _)| base.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| LLMError::UnsupportedModel(model.to_string()))
    }

    /// Short backend name, also used as the provider name
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Configuration keys holding the API key, in lookup order
    pub fn api_key_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["OPENAI_API_KEY"],
            Self::DeepSeek => &["DEEPSEEK_API_KEY", "deepseek_API_KEY"],
        }
    }

    /// Configuration key overriding the endpoint base
    pub fn base_url_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_BASE_URL",
            Self::DeepSeek => "DEEPSEEK_BASE_URL",
        }
    }

    /// Endpoint base used when no override is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::DeepSeek => "https://api.deepseek.com/v1",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to reach a backend
#[derive(Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// Selected backend
    pub kind: BackendKind,
    /// API key
    pub api_key: String,
    /// Endpoint base, without a trailing slash
    pub api_base: String,
}

impl BackendSettings {
    /// Select the backend for `model` and read its credential and endpoint
    ///
    /// # Errors
    ///
    /// - [`LLMError::UnsupportedModel`] if no prefix matches
    /// - [`LLMError::MissingCredential`] if the key is unset, empty, or a
    ///   placeholder value
    pub fn resolve(model: &str, source: &dyn ConfigSource) -> Result<Self> {
        let kind = BackendKind::from_model(model)?;

        let api_key = kind
            .api_key_vars()
            .iter()
            .find_map(|key| source.get_non_empty(key))
            .filter(|key| !key.starts_with(PLACEHOLDER_PREFIX))
            .ok_or_else(|| LLMError::MissingCredential {
                backend: kind.name().to_string(),
                key: kind.api_key_vars()[0].to_string(),
            })?;

        let api_base = source
            .get_or(kind.base_url_var(), kind.default_base_url())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            kind,
            api_key,
            api_base,
        })
    }
}

impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSettings")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_utils::MapSource;

    #[test]
    fn test_prefix_table() {
        assert_eq!(BackendKind::from_model("gpt-4o-mini").unwrap(), BackendKind::OpenAi);
        assert_eq!(BackendKind::from_model("GPT-3.5-turbo").unwrap(), BackendKind::OpenAi);
        assert_eq!(
            BackendKind::from_model("deepseek-chat").unwrap(),
            BackendKind::DeepSeek
        );
    }

    #[test]
    fn test_unknown_model_is_unsupported() {
        let err = BackendKind::from_model("llama-3-70b").unwrap_err();
        assert!(matches!(err, LLMError::UnsupportedModel(ref m) if m == "llama-3-70b"));

        // Only prefixes count, not substrings
        assert!(BackendKind::from_model("my-gpt-clone").is_err());
    }

    #[test]
    fn test_fine_tuned_ids() {
        assert_eq!(
            BackendKind::from_model("ft:gpt-4o-mini:acme::abc123").unwrap(),
            BackendKind::OpenAi
        );
        assert!(BackendKind::from_model("ft:llama-3:acme::abc123").is_err());
    }

    #[test]
    fn test_resolve_openai_with_default_base() {
        let source = MapSource::new().with("OPENAI_API_KEY", "sk-live");
        let settings = BackendSettings::resolve("gpt-4o-mini", &source).unwrap();
        assert_eq!(settings.kind, BackendKind::OpenAi);
        assert_eq!(settings.api_key, "sk-live");
        assert_eq!(settings.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_resolve_base_override_strips_slash() {
        let source = MapSource::new()
            .with("OPENAI_API_KEY", "sk-live")
            .with("OPENAI_BASE_URL", "https://proxy.example.com/v1/");
        let settings = BackendSettings::resolve("gpt-4o", &source).unwrap();
        assert_eq!(settings.api_base, "https://proxy.example.com/v1");
    }

    #[test]
    fn test_resolve_deepseek_legacy_key() {
        let source = MapSource::new().with("deepseek_API_KEY", "sk-ds");
        let settings = BackendSettings::resolve("deepseek-chat", &source).unwrap();
        assert_eq!(settings.kind, BackendKind::DeepSeek);
        assert_eq!(settings.api_key, "sk-ds");
        assert_eq!(settings.api_base, "https://api.deepseek.com/v1");
    }

    #[test]
    fn test_missing_or_placeholder_key() {
        let empty = MapSource::new();
        let err = BackendSettings::resolve("gpt-4o-mini", &empty).unwrap_err();
        assert!(matches!(err, LLMError::MissingCredential { ref key, .. } if key == "OPENAI_API_KEY"));

        let placeholder = MapSource::new().with("OPENAI_API_KEY", "your_openai_api_key_here");
        assert!(BackendSettings::resolve("gpt-4o-mini", &placeholder).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let source = MapSource::new().with("OPENAI_API_KEY", "sk-secret");
        let settings = BackendSettings::resolve("gpt-4o-mini", &source).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("redacted"));
    }
}
