//! Read-only prompt template catalog
//!
//! The catalog is assembled once at start-up through [`CatalogBuilder`] and
//! never mutated afterwards. Share it behind an `Arc`; lookups need no
//! locking.

use crate::{PromptError, PromptTemplate, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable name → template map
///
/// # Examples
///
/// ```
/// use agent_prompt::{PromptCatalog, PromptTemplate};
/// use serde_json::json;
///
/// let catalog = PromptCatalog::builder()
///     .register(PromptTemplate::new("analyzer", "Analyze {{ symbol }}").unwrap())
///     .build();
///
/// let prompt = catalog.format("analyzer", &json!({ "symbol": "AAPL" })).unwrap();
/// assert_eq!(prompt, "Analyze AAPL");
/// assert!(catalog.format("missing", &json!({})).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptCatalog {
    templates: HashMap<String, Arc<PromptTemplate>>,
}

impl PromptCatalog {
    /// Start building a catalog
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Result<Arc<PromptTemplate>> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| PromptError::TemplateNotFound(name.to_string()))
    }

    /// Check if a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Look up `name` and substitute `fields` into it
    ///
    /// # Errors
    ///
    /// - [`PromptError::TemplateNotFound`] if the name is unregistered
    /// - [`PromptError::MissingField`] if a placeholder has no field
    pub fn format(&self, name: &str, fields: &serde_json::Value) -> Result<String> {
        self.get(name)?.render(fields)
    }

    /// Registered template names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Builder for [`PromptCatalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    templates: HashMap<String, Arc<PromptTemplate>>,
}

impl CatalogBuilder {
    /// Register a template; a later template with the same name replaces it
    pub fn register(mut self, template: PromptTemplate) -> Self {
        if self.templates.contains_key(template.name()) {
            tracing::debug!("Replacing prompt template '{}'", template.name());
        }
        self.templates
            .insert(template.name().to_string(), Arc::new(template));
        self
    }

    /// Register several templates
    pub fn register_all(self, templates: impl IntoIterator<Item = PromptTemplate>) -> Self {
        templates.into_iter().fold(self, Self::register)
    }

    /// Freeze the catalog
    pub fn build(self) -> PromptCatalog {
        PromptCatalog {
            templates: self.templates,
        }
    }
}
