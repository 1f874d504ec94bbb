//! Named prompt templates backed by MiniJinja
//!
//! A [`PromptTemplate`] is an immutable, named template string with
//! `{{ slot }}` placeholders. Rendering is strict: a placeholder with no
//! matching field is an error, never an empty substitution, so a caller
//! can't receive a half-filled prompt.

use crate::{PromptError, Result};
use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value};
use std::collections::BTreeSet;

/// A named prompt template
///
/// # Template Syntax
///
/// Standard Jinja2 syntax as implemented by MiniJinja:
/// - Variables: `{{ news_summary }}`
/// - Filters: `{{ symbol | upper }}`
/// - Conditionals: `{% if history_info %}...{% endif %}`
///
/// # Examples
///
/// ```
/// use agent_prompt::PromptTemplate;
/// use serde_json::json;
///
/// let template = PromptTemplate::new("greeting", "Analyze {{ symbol }}").unwrap();
/// let prompt = template.render(&json!({ "symbol": "AAPL" })).unwrap();
/// assert_eq!(prompt, "Analyze AAPL");
///
/// // Missing fields are errors, not blanks
/// assert!(template.render(&json!({})).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    source: String,
}

impl PromptTemplate {
    /// Create a template, checking that the source parses
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let env = environment();
        env.template_from_str(&source)
            .map_err(|e| PromptError::TemplateParseFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;

        Ok(Self { name, source })
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the top-level fields the template reads, sorted
    pub fn placeholders(&self) -> Vec<String> {
        let env = environment();
        env.template_from_str(&self.source)
            .map(|t| {
                t.undeclared_variables(false)
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Render with the given fields
    ///
    /// `fields` is normally a JSON object; its keys are the substitution set.
    ///
    /// # Errors
    ///
    /// - [`PromptError::MissingField`] if a placeholder has no field
    /// - [`PromptError::RenderError`] for any other rendering failure
    pub fn render(&self, fields: &serde_json::Value) -> Result<String> {
        let env = environment();
        env.render_str(&self.source, Value::from_serialize(fields))
            .map_err(|e| {
                if e.kind() == ErrorKind::UndefinedError {
                    PromptError::MissingField {
                        name: self.name.clone(),
                        detail: e.to_string(),
                    }
                } else {
                    PromptError::RenderError {
                        name: self.name.clone(),
                        detail: e.to_string(),
                    }
                }
            })
    }
}

impl std::fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptTemplate")
            .field("name", &self.name)
            .field("placeholders", &self.placeholders())
            .finish_non_exhaustive()
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}
