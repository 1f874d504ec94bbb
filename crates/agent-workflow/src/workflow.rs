//! Workflow definition and execution
//!
//! A run is four stages in a fixed order:
//!
//! ```text
//! Prepare → Compile → Analyze → Persist → Done
//! ```
//!
//! Each stage takes the [`PipelineState`] by value and hands it back with
//! its own fields filled in. Fields that are already populated are left
//! alone, so a caller can pre-fill any of them.

use crate::error::{Result, WorkflowError};
use crate::state::{AnalysisRequest, PipelineState};
use agent_prompt::PromptCatalog;
use agent_stock::prompts::build_catalog;
use agent_stock::{
    AnalysisClient, AnalysisKind, HistoryStore, MarketDataFetcher, MarketDataProvider,
    PromptCompiler, StockConfig, YahooProvider,
};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Prepare,
    Compile,
    Analyze,
    Persist,
    Done,
}

impl Stage {
    /// The stage that follows this one
    pub fn next(self) -> Self {
        match self {
            Self::Prepare => Self::Compile,
            Self::Compile => Self::Analyze,
            Self::Analyze => Self::Persist,
            Self::Persist | Self::Done => Self::Done,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Compile => "compile",
            Self::Analyze => "analyze",
            Self::Persist => "persist",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four-stage analysis pipeline
///
/// # Example
///
/// ```no_run
/// use agent_stock::{AnalysisClient, StockConfig};
/// use agent_utils::EnvSource;
/// use agent_workflow::{AnalysisRequest, Workflow};
///
/// # async fn example() -> agent_workflow::Result<()> {
/// let config = StockConfig::default();
/// let client = AnalysisClient::from_config("gpt-4o-mini", &EnvSource::with_dotenv(), &config)?;
///
/// let workflow = Workflow::builder()
///     .config(config)
///     .client(client)
///     .build()?;
///
/// let state = workflow
///     .analyze(AnalysisRequest::new("gpt-4o-mini", ["AAPL"], ["network_effect"]))
///     .await?;
/// println!("{:?}", state.analysis_results);
/// # Ok(())
/// # }
/// ```
pub struct Workflow {
    fetcher: MarketDataFetcher,
    history: HistoryStore,
    compiler: PromptCompiler,
    client: AnalysisClient,
}

impl Workflow {
    /// Create a new workflow builder
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::default()
    }

    /// Template catalog styles are resolved against
    pub fn catalog(&self) -> &PromptCatalog {
        self.compiler.catalog()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Validate a request and run every stage
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<PipelineState> {
        self.run(PipelineState::from(request)).await
    }

    /// Validate the state and run every stage in order
    #[instrument(skip_all, fields(model = %state.model_name, symbols = state.len()))]
    pub async fn run(&self, state: PipelineState) -> Result<PipelineState> {
        self.validate(&state)?;

        let mut state = state;
        let mut stage = Stage::Prepare;
        while stage != Stage::Done {
            info!("Running stage {}", stage);
            state = self.run_stage(stage, state).await?;
            stage = stage.next();
        }

        info!("Pipeline finished for {} symbols", state.len());
        Ok(state)
    }

    /// Run a single stage
    pub async fn run_stage(&self, stage: Stage, state: PipelineState) -> Result<PipelineState> {
        match stage {
            Stage::Prepare => Ok(self.prepare(state).await),
            Stage::Compile => self.compile(state),
            Stage::Analyze => self.analyze_prompts(state).await,
            Stage::Persist => self.persist(state),
            Stage::Done => Ok(state),
        }
    }

    /// Reject states that cannot produce index-aligned output
    ///
    /// Runs before any stage; nothing is fetched or called on failure.
    pub fn validate(&self, state: &PipelineState) -> Result<()> {
        let expected = state.len();
        if expected == 0 {
            return Err(WorkflowError::EmptySymbols);
        }

        if state.model_name != self.client.model() {
            return Err(WorkflowError::ModelMismatch {
                requested: state.model_name.clone(),
                configured: self.client.model().to_string(),
            });
        }

        let lengths = [
            ("analysis_styles", Some(state.analysis_styles.len())),
            ("today_info_list", state.today_info_list.as_ref().map(Vec::len)),
            ("prompt_params_list", state.prompt_params_list.as_ref().map(Vec::len)),
            ("today_info", state.today_info.as_ref().map(Vec::len)),
            ("history_info", state.history_info.as_ref().map(Vec::len)),
            ("analysis_prompts", state.analysis_prompts.as_ref().map(Vec::len)),
            ("history_prompts", state.history_prompts.as_ref().map(Vec::len)),
            ("analysis_results", state.analysis_results.as_ref().map(Vec::len)),
            ("history_results", state.history_results.as_ref().map(Vec::len)),
        ];
        for (field, actual) in lengths {
            match actual {
                Some(actual) if actual != expected => {
                    return Err(WorkflowError::LengthMismatch {
                        field,
                        expected,
                        actual,
                    });
                }
                _ => {}
            }
        }

        if let Some(style) = state
            .analysis_styles
            .iter()
            .find(|style| !self.catalog().contains(style))
        {
            return Err(WorkflowError::UnknownStyle(style.clone()));
        }

        Ok(())
    }

    /// Resolve today's info for every symbol and load stored history
    async fn prepare(&self, mut state: PipelineState) -> PipelineState {
        if state.today_info.is_none() {
            let mut today_info = Vec::with_capacity(state.len());
            for (i, symbol) in state.stock_list.iter().enumerate() {
                let supplied = state
                    .today_info_list
                    .as_ref()
                    .and_then(|list| list.get(i))
                    .and_then(Option::as_ref);

                let record = match supplied {
                    Some(record) => record.clone(),
                    None => self.fetcher.fetch_one(symbol, state.date).await,
                };
                today_info.push(record);
            }
            state.today_info = Some(today_info);
        }

        if state.history_info.is_none() {
            state.history_info = Some(self.history.load(&state.stock_list));
        }

        state
    }

    /// Build analysis and history-summary prompts
    fn compile(&self, mut state: PipelineState) -> Result<PipelineState> {
        let today_info = require(Stage::Compile, "today_info", state.today_info.as_ref())?;
        let history_info = require(Stage::Compile, "history_info", state.history_info.as_ref())?;

        if state.analysis_prompts.is_none() {
            state.analysis_prompts = Some(self.compiler.compile_analysis(
                today_info,
                history_info,
                &state.analysis_styles,
                state.prompt_params_list.as_deref(),
            ));
        }
        if state.history_prompts.is_none() {
            state.history_prompts = Some(self.compiler.compile_history(today_info, history_info));
        }
        Ok(state)
    }

    /// Send both prompt batches to the model
    async fn analyze_prompts(&self, mut state: PipelineState) -> Result<PipelineState> {
        let analysis_prompts =
            require(Stage::Analyze, "analysis_prompts", state.analysis_prompts.as_ref())?;
        let history_prompts =
            require(Stage::Analyze, "history_prompts", state.history_prompts.as_ref())?;

        if state.analysis_results.is_none() {
            state.analysis_results = Some(
                self.client
                    .analyze_batch(AnalysisKind::Forward, analysis_prompts)
                    .await,
            );
        }
        if state.history_results.is_none() {
            state.history_results = Some(
                self.client
                    .analyze_batch(AnalysisKind::History, history_prompts)
                    .await,
            );
        }
        Ok(state)
    }

    /// Write history-summary results back to the store
    fn persist(&self, state: PipelineState) -> Result<PipelineState> {
        let history_results =
            require(Stage::Persist, "history_results", state.history_results.as_ref())?;
        self.history.save(&state.stock_list, history_results);
        Ok(state)
    }
}

fn require<'a, T>(stage: Stage, field: &'static str, value: Option<&'a T>) -> Result<&'a T> {
    value.ok_or(WorkflowError::MissingStageOutput { stage, field })
}

/// Builder for constructing workflows
///
/// Only the analysis client is required. The market provider defaults to
/// Yahoo Finance, the catalog to the built-ins plus `config.templates_dir`,
/// and the history store to `config.history_file`.
#[derive(Default)]
pub struct WorkflowBuilder {
    config: Option<StockConfig>,
    client: Option<AnalysisClient>,
    market_provider: Option<Arc<dyn MarketDataProvider>>,
    catalog: Option<Arc<PromptCatalog>>,
    history: Option<HistoryStore>,
}

impl WorkflowBuilder {
    pub fn config(mut self, config: StockConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the LLM client; its model is the only model this workflow serves
    pub fn client(mut self, client: AnalysisClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn market_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.market_provider = Some(provider);
        self
    }

    pub fn catalog(mut self, catalog: Arc<PromptCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn history_store(mut self, history: HistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    /// Build the workflow
    pub fn build(self) -> Result<Workflow> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let client = self
            .client
            .ok_or_else(|| WorkflowError::Configuration("analysis client not set".to_string()))?;

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(build_catalog(config.templates_dir.as_deref())?),
        };
        let provider = self
            .market_provider
            .unwrap_or_else(|| Arc::new(YahooProvider::new()));
        let history = self
            .history
            .unwrap_or_else(|| HistoryStore::new(&config.history_file));

        Ok(Workflow {
            fetcher: MarketDataFetcher::new(provider),
            history,
            compiler: PromptCompiler::new(catalog),
            client,
        })
    }
}
