//! Four-stage network-effect analysis pipeline for news-agent-rs
//!
//! This crate threads a [`PipelineState`] through
//! `Prepare → Compile → Analyze → Persist` and exposes two entry points:
//!
//! - [`analyze_stocks_simple`] returns the analysis texts
//! - [`analyze_stocks_advanced`] returns the full final state
//!
//! Both read credentials and settings from a [`ConfigSource`].

pub mod error;
pub mod state;
pub mod workflow;

// Re-export for convenience
pub use error::{Result, WorkflowError};
pub use state::{AnalysisRequest, PipelineState};
pub use workflow::{Stage, Workflow, WorkflowBuilder};

use agent_stock::{AnalysisClient, StockConfig};
use agent_utils::ConfigSource;

/// Assemble a workflow for `model` from configuration
///
/// The LLM backend is resolved here, so an unsupported model or a missing
/// credential fails before any data is fetched.
pub fn workflow_from_source(model: &str, source: &dyn ConfigSource) -> Result<Workflow> {
    let config = StockConfig::from_source(source)?;
    let client = AnalysisClient::from_config(model, source, &config)?;

    Workflow::builder().config(config).client(client).build()
}

/// Run the pipeline and return the full final state
pub async fn analyze_stocks_advanced(
    request: AnalysisRequest,
    source: &dyn ConfigSource,
) -> Result<PipelineState> {
    let workflow = workflow_from_source(&request.model, source)?;
    workflow.analyze(request).await
}

/// Run the pipeline and return one analysis text per symbol
pub async fn analyze_stocks_simple(
    request: AnalysisRequest,
    source: &dyn ConfigSource,
) -> Result<Vec<String>> {
    let state = analyze_stocks_advanced(request, source).await?;
    Ok(state.analysis_results.unwrap_or_default())
}
