//! Batch LLM analysis
//!
//! [`AnalysisClient`] sends prompts one at a time, in order, and always
//! returns one text per prompt. A failed call leaves `"analysis failed: ..."`
//! in its slot.

use crate::config::StockConfig;
use crate::error::Result;
use agent_llm::{BackendSettings, CompletionRequest, LLMProvider, Message, providers};
use agent_utils::ConfigSource;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Prefix of the text left in a slot whose call failed
pub const FAILURE_PREFIX: &str = "analysis failed:";

/// Which batch a prompt belongs to; selects the system instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    /// Analyse the stock from today's information
    Forward,
    /// Summarise the stock's history
    History,
}

impl AnalysisKind {
    /// System instruction sent with every prompt of this kind
    pub fn system_instruction(&self) -> &'static str {
        match self {
            Self::Forward => "你是一个专业的股票分析师，请根据提供的信息进行股票分析。",
            Self::History => {
                "你是一个专业的股票分析师，请根据提供的信息对这支股票的历史信息进行总结。"
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Forward => "analysis",
            Self::History => "history summary",
        }
    }
}

/// Sequential, order-preserving LLM client
#[derive(Clone)]
pub struct AnalysisClient {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

impl AnalysisClient {
    /// Wrap an existing provider
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        let defaults = StockConfig::default();
        Self {
            provider,
            model: model.into(),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    /// Select the backend for `model`, read its credential and build the client
    ///
    /// # Errors
    ///
    /// Fails with an LLM configuration error if the model matches no backend
    /// or the backend has no usable credential.
    pub fn from_config(model: &str, source: &dyn ConfigSource, config: &StockConfig) -> Result<Self> {
        let settings = BackendSettings::resolve(model, source)?;
        info!("Using {} backend at {} for {}", settings.kind, settings.api_base, model);

        let provider = providers::from_settings(&settings, config.request_timeout_secs)?;
        Ok(Self::new(provider, model)
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature))
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Single call; errors are returned
    pub async fn analyze_one(&self, kind: AnalysisKind, prompt: &str) -> agent_llm::Result<String> {
        let request = CompletionRequest::builder(&self.model)
            .system(kind.system_instruction())
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build();

        let response = self.provider.complete(request).await?;
        Ok(response.text().to_string())
    }

    /// One response per prompt, in order
    #[instrument(skip(self, prompts), fields(model = %self.model, count = prompts.len()))]
    pub async fn analyze_batch(&self, kind: AnalysisKind, prompts: &[String]) -> Vec<String> {
        let total = prompts.len();
        let mut results = Vec::with_capacity(total);

        for (i, prompt) in prompts.iter().enumerate() {
            info!("Running {} {}/{}", kind.label(), i + 1, total);
            match self.analyze_one(kind, prompt).await {
                Ok(text) => results.push(text),
                Err(e) => {
                    warn!("{} {} failed: {}", kind.label(), i + 1, e);
                    results.push(format!("{FAILURE_PREFIX} {e}"));
                }
            }
        }

        results
    }
}

impl std::fmt::Debug for AnalysisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}
