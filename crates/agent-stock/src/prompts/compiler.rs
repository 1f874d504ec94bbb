//! Prompt compilation from fetched data and stored history

use super::{NETWORK_EFFECT, NETWORK_EFFECT_HISTORY};
use crate::market::InfoRecord;
use agent_prompt::{PromptCatalog, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Stands in for an analysis prompt that failed to compile
pub const ANALYSIS_SENTINEL: &str = "analysis prompt compilation failed";
/// Stands in for a history prompt that failed to compile
pub const HISTORY_SENTINEL: &str = "history prompt compilation failed";

/// Builds per-symbol prompts
///
/// The substitution set for a symbol is its info record, plus
/// `history_info` (empty when there is no history), plus any override
/// record laid on top. Override keys win.
#[derive(Debug, Clone)]
pub struct PromptCompiler {
    catalog: Arc<PromptCatalog>,
}

impl PromptCompiler {
    pub fn new(catalog: Arc<PromptCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    /// Analysis prompt for one symbol
    pub fn compile_analysis_one(
        &self,
        style: &str,
        info: &InfoRecord,
        history: Option<&str>,
        overrides: Option<&InfoRecord>,
    ) -> Result<String> {
        self.catalog
            .format(style, &substitution_set(info, history, overrides))
    }

    /// History-summary prompt for one symbol
    pub fn compile_history_one(&self, info: &InfoRecord, history: Option<&str>) -> Result<String> {
        self.catalog
            .format(NETWORK_EFFECT_HISTORY, &substitution_set(info, history, None))
    }

    /// Analysis prompts for every symbol, in order
    ///
    /// A symbol whose prompt fails to compile gets [`ANALYSIS_SENTINEL`].
    /// A missing style slot falls back to `network_effect`.
    pub fn compile_analysis(
        &self,
        infos: &[InfoRecord],
        histories: &[Option<String>],
        styles: &[String],
        overrides: Option<&[Option<InfoRecord>]>,
    ) -> Vec<String> {
        infos
            .iter()
            .enumerate()
            .map(|(i, info)| {
                let style = styles.get(i).map_or(NETWORK_EFFECT, String::as_str);
                let history = histories.get(i).and_then(Option::as_deref);
                let params = overrides.and_then(|o| o.get(i)).and_then(Option::as_ref);

                self.compile_analysis_one(style, info, history, params)
                    .unwrap_or_else(|e| {
                        warn!("Failed to compile analysis prompt {}: {}", i, e);
                        ANALYSIS_SENTINEL.to_string()
                    })
            })
            .collect()
    }

    /// History-summary prompts for every symbol, in order
    ///
    /// A symbol whose prompt fails to compile gets [`HISTORY_SENTINEL`].
    pub fn compile_history(&self, infos: &[InfoRecord], histories: &[Option<String>]) -> Vec<String> {
        infos
            .iter()
            .enumerate()
            .map(|(i, info)| {
                let history = histories.get(i).and_then(Option::as_deref);
                self.compile_history_one(info, history).unwrap_or_else(|e| {
                    warn!("Failed to compile history prompt {}: {}", i, e);
                    HISTORY_SENTINEL.to_string()
                })
            })
            .collect()
    }
}

fn substitution_set(info: &InfoRecord, history: Option<&str>, overrides: Option<&InfoRecord>) -> Value {
    let mut fields = info.clone();
    fields.insert("history_info".into(), history.unwrap_or_default().into());
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            fields.insert(key.clone(), value.clone());
        }
    }
    Value::Object(fields)
}
