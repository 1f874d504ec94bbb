//! Network-effect prompt templates and compilation
//!
//! This module contains the built-in templates and the compiler that turns
//! fetched data into prompts:
//! - `templates`: the three built-in network-effect templates
//! - `compiler`: per-symbol substitution with sentinel fallback

mod compiler;
mod templates;

pub use compiler::{ANALYSIS_SENTINEL, HISTORY_SENTINEL, PromptCompiler};
pub use templates::{network_effect, network_effect_analysis, network_effect_history};

use agent_prompt::{FileLoader, PromptCatalog, PromptTemplate, Result};
use std::path::Path;

/// Forward analysis style
pub const NETWORK_EFFECT: &str = "network_effect";
/// Structured extraction style
pub const NETWORK_EFFECT_ANALYSIS: &str = "network_effect_analysis";
/// History summarisation template
pub const NETWORK_EFFECT_HISTORY: &str = "network_effect_history";

/// All built-in templates
pub fn builtin_templates() -> Result<Vec<PromptTemplate>> {
    Ok(vec![
        network_effect()?,
        network_effect_analysis()?,
        network_effect_history()?,
    ])
}

/// Build the catalog from the built-ins plus an optional template directory
///
/// A file named like a built-in replaces it; other files add new styles.
///
/// # Example
///
/// ```
/// use agent_stock::prompts::build_catalog;
///
/// let catalog = build_catalog(None).unwrap();
/// assert_eq!(
///     catalog.names(),
///     vec!["network_effect", "network_effect_analysis", "network_effect_history"]
/// );
/// ```
pub fn build_catalog(templates_dir: Option<&Path>) -> Result<PromptCatalog> {
    let mut builder = PromptCatalog::builder().register_all(builtin_templates()?);

    if let Some(dir) = templates_dir {
        let loader = FileLoader::new(dir);
        if loader.exists() {
            let loaded = loader.load_all()?;
            tracing::info!("Loaded {} prompt templates from {}", loaded.len(), dir.display());
            builder = builder.register_all(loaded);
        } else {
            tracing::warn!("Template directory {} does not exist, using built-ins", dir.display());
        }
    }

    Ok(builder.build())
}
