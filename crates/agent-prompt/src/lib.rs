//! Prompt template management for news-agent-rs
//!
//! This crate provides a read-only catalog of named prompt templates with
//! strict placeholder substitution.
//!
//! # Features
//!
//! - **Named templates**: Jinja2 syntax (`{{ variable }}`) rendered by MiniJinja
//! - **Strict substitution**: a placeholder without a field is an error
//! - **Immutable catalog**: built once, shared behind `Arc`, lock-free lookups
//! - **File loading**: templates can live in a directory and be edited freely
//!
//! # Quick Start
//!
//! ```
//! use agent_prompt::{PromptCatalog, PromptError, PromptTemplate};
//! use serde_json::json;
//!
//! let catalog = PromptCatalog::builder()
//!     .register(PromptTemplate::new("analyzer", "分析 {{ symbol }}").unwrap())
//!     .build();
//!
//! let prompt = catalog.format("analyzer", &json!({ "symbol": "AAPL" })).unwrap();
//! assert_eq!(prompt, "分析 AAPL");
//!
//! let err = catalog.format("analyzer", &json!({})).unwrap_err();
//! assert!(matches!(err, PromptError::MissingField { .. }));
//! ```

mod catalog;
mod error;
mod loader;
mod template;

// Re-export core types
pub use catalog::{CatalogBuilder, PromptCatalog};
pub use error::{PromptError, Result};
pub use loader::FileLoader;
pub use template::PromptTemplate;
