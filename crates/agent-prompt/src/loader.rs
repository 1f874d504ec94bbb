//! File-based template loader
//!
//! [`FileLoader`] reads templates from a directory so prompt wording can be
//! edited or extended without recompiling. Each `{name}.jinja` or
//! `{name}.j2` file becomes a template called `{name}`.
//!
//! ```text
//! prompts/
//! ├── network_effect.jinja          # replaces the built-in template
//! └── platform_moat.j2              # adds a new style
//! ```

use crate::{PromptError, PromptTemplate, Result};
use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["jinja", "j2"];

/// A file-based template loader
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_path: PathBuf,
}

impl FileLoader {
    /// Create a new file loader with the given base path
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Check if the base directory exists
    pub fn exists(&self) -> bool {
        self.base_path.is_dir()
    }

    /// Load every template in the base directory, sorted by name
    pub fn load_all(&self) -> Result<Vec<PromptTemplate>> {
        let entries = std::fs::read_dir(&self.base_path).map_err(|e| PromptError::FileLoadError {
            path: self.base_path.display().to_string(),
            detail: e.to_string(),
        })?;

        let mut templates = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| PromptError::FileLoadError {
                    path: self.base_path.display().to_string(),
                    detail: e.to_string(),
                })?
                .path();

            if !path.is_file() {
                continue;
            }
            let Some(name) = template_name(&path) else {
                continue;
            };

            tracing::debug!("Loading prompt template '{}' from {}", name, path.display());
            templates.push(read_template(&name, &path)?);
        }

        templates.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(templates)
    }
}

fn template_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}

fn read_template(name: &str, path: &Path) -> Result<PromptTemplate> {
    let content = std::fs::read_to_string(path).map_err(|e| PromptError::FileLoadError {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    PromptTemplate::new(name, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_file(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_template_name() {
        assert_eq!(
            template_name(Path::new("prompts/network_effect.jinja")),
            Some("network_effect".to_string())
        );
        assert_eq!(template_name(Path::new("moat.j2")), Some("moat".to_string()));
        assert_eq!(template_name(Path::new("notes.txt")), None);
        assert_eq!(template_name(Path::new("README")), None);
    }

    #[test]
    fn test_load_all_renders() {
        let dir = tempdir().unwrap();
        create_test_file(dir.path(), "greeting.jinja", "Hello, {{ name }}!");

        let templates = FileLoader::new(dir.path()).load_all().unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name(), "greeting");
        assert_eq!(templates[0].render(&json!({ "name": "AAPL" })).unwrap(), "Hello, AAPL!");
    }

    #[test]
    fn test_load_all_skips_other_files() {
        let dir = tempdir().unwrap();
        create_test_file(dir.path(), "network_effect.jinja", "{{ news_summary }}");
        create_test_file(dir.path(), "platform_moat.j2", "{{ raw_news_text }}");
        create_test_file(dir.path(), "notes.md", "not a template");
        fs::create_dir(dir.path().join("nested.jinja")).unwrap();

        let loader = FileLoader::new(dir.path());
        let templates = loader.load_all().unwrap();

        let names: Vec<_> = templates.iter().map(PromptTemplate::name).collect();
        assert_eq!(names, vec!["network_effect", "platform_moat"]);
    }

    #[test]
    fn test_load_invalid_template() {
        let dir = tempdir().unwrap();
        create_test_file(dir.path(), "broken.jinja", "{{ unclosed");

        let loader = FileLoader::new(dir.path());
        assert!(matches!(
            loader.load_all(),
            Err(PromptError::TemplateParseFailed { .. })
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(FileLoader::new(dir.path()).load_all().unwrap().is_empty());
    }

    #[test]
    fn test_exists() {
        let dir = tempdir().unwrap();
        assert!(FileLoader::new(dir.path()).exists());
        assert!(!FileLoader::new("/nonexistent/path").exists());
        assert!(FileLoader::new("/nonexistent/path").load_all().is_err());
    }
}
