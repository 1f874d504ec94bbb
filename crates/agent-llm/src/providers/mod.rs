//! Concrete LLM provider implementations
//!
//! Both supported backends speak the OpenAI chat-completions protocol, so a
//! single provider type serves them; [`from_settings`] picks the endpoint and
//! credential.

pub mod openai;

pub use openai::{OpenAIConfig, OpenAIProvider};

use crate::{BackendSettings, LLMProvider, Result};
use std::sync::Arc;

/// Build a provider for resolved backend settings
pub fn from_settings(settings: &BackendSettings, timeout_secs: u64) -> Result<Arc<dyn LLMProvider>> {
    let config = OpenAIConfig::new(settings.api_key.clone())
        .with_api_base(settings.api_base.clone())
        .with_timeout(timeout_secs)
        .with_name(settings.kind.name());

    Ok(Arc::new(OpenAIProvider::with_config(config)?))
}
