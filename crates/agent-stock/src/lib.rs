//! Stock news network-effect analysis building blocks
//!
//! This crate provides the pieces the analysis pipeline is assembled from:
//!
//! - Market data retrieval with per-symbol error records (Yahoo Finance)
//! - A JSON-file history store holding the latest summary per symbol
//! - Built-in network-effect prompt templates and the prompt compiler
//! - A sequential LLM analysis client that never fails a batch
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_stock::{AnalysisClient, AnalysisKind, MarketDataFetcher, PromptCompiler, YahooProvider};
//! use agent_stock::prompts::build_catalog;
//! use agent_utils::EnvSource;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = agent_stock::StockConfig::default();
//!     let fetcher = MarketDataFetcher::new(Arc::new(YahooProvider::new()));
//!     let compiler = PromptCompiler::new(Arc::new(build_catalog(None)?));
//!     let client = AnalysisClient::from_config("gpt-4o-mini", &EnvSource::with_dotenv(), &config)?;
//!
//!     let symbols = vec!["AAPL".to_string()];
//!     let infos = fetcher.fetch(&symbols, None).await;
//!     let prompts = compiler.compile_analysis(&infos, &[None], &["network_effect".into()], None);
//!     println!("{:?}", client.analyze_batch(AnalysisKind::Forward, &prompts).await);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod history;
pub mod market;
pub mod prompts;

// Re-export main types for convenience
pub use analysis::{AnalysisClient, AnalysisKind};
pub use config::StockConfig;
pub use error::{Result, StockError};
pub use history::HistoryStore;
pub use market::{DailyBar, InfoRecord, MarketDataFetcher, MarketDataProvider, YahooProvider};
pub use prompts::PromptCompiler;
