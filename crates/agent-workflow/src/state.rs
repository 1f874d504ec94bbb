//! Pipeline state and run requests

use agent_stock::InfoRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs for one pipeline run
///
/// Per-symbol lists are index-aligned with `symbols`. In `today_info` and
/// `prompt_params` a `None` slot means "nothing supplied for this symbol".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub model: String,
    pub symbols: Vec<String>,
    pub styles: Vec<String>,
    #[serde(default)]
    pub today_info: Option<Vec<Option<InfoRecord>>>,
    #[serde(default)]
    pub prompt_params: Option<Vec<Option<InfoRecord>>>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl AnalysisRequest {
    pub fn new(
        model: impl Into<String>,
        symbols: impl IntoIterator<Item = impl Into<String>>,
        styles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            model: model.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
            styles: styles.into_iter().map(Into::into).collect(),
            today_info: None,
            prompt_params: None,
            date: None,
        }
    }

    /// Supply info records; `None` slots are fetched
    pub fn with_today_info(mut self, today_info: Vec<Option<InfoRecord>>) -> Self {
        self.today_info = Some(today_info);
        self
    }

    /// Supply per-symbol substitution overrides
    pub fn with_prompt_params(mut self, prompt_params: Vec<Option<InfoRecord>>) -> Self {
        self.prompt_params = Some(prompt_params);
        self
    }

    /// Analyse a specific trading day instead of the live snapshot
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// The record threaded through every stage
///
/// The first block of fields comes from the request; the rest are filled by
/// the stages, each only if still empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub model_name: String,
    pub stock_list: Vec<String>,
    pub analysis_styles: Vec<String>,
    pub today_info_list: Option<Vec<Option<InfoRecord>>>,
    pub prompt_params_list: Option<Vec<Option<InfoRecord>>>,
    pub date: Option<NaiveDate>,

    pub today_info: Option<Vec<InfoRecord>>,
    pub history_info: Option<Vec<Option<String>>>,
    pub analysis_prompts: Option<Vec<String>>,
    pub history_prompts: Option<Vec<String>>,
    pub analysis_results: Option<Vec<String>>,
    pub history_results: Option<Vec<String>>,
}

impl PipelineState {
    /// Number of symbols in the run
    pub fn len(&self) -> usize {
        self.stock_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock_list.is_empty()
    }
}

impl From<AnalysisRequest> for PipelineState {
    fn from(request: AnalysisRequest) -> Self {
        Self {
            model_name: request.model,
            stock_list: request.symbols,
            analysis_styles: request.styles,
            today_info_list: request.today_info,
            prompt_params_list: request.prompt_params,
            date: request.date,
            today_info: None,
            history_info: None,
            analysis_prompts: None,
            history_prompts: None,
            analysis_results: None,
            history_results: None,
        }
    }
}
