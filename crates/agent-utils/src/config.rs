//! Key/value configuration sources
//!
//! Credentials, endpoint bases and file locations are never hard-coded into
//! the pipeline. Components receive a [`ConfigSource`] and look keys up
//! through it, so the same code runs against the process environment in
//! production and against an in-memory map in tests.

use std::collections::HashMap;
use std::path::Path;

/// Environment-style key/value lookup
pub trait ConfigSource: Send + Sync {
    /// Look up a key, returning `None` when it is not set
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a key, treating empty (whitespace-only) values as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Look up a key with a fallback value
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get_non_empty(key)
            .unwrap_or_else(|| default.to_string())
    }
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl EnvSource {
    /// Create a source backed by `std::env`
    pub fn new() -> Self {
        Self
    }

    /// Load a `.env` file from the current directory (or a parent) into the
    /// process environment, then read from it. A missing file is not an error.
    pub fn with_dotenv() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to load .env file: {e}"),
        }
        Self
    }

    /// Load a specific dotenv file into the process environment
    pub fn with_dotenv_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Err(e) = dotenvy::from_path(path) {
            tracing::warn!("Failed to load {}: {e}", path.display());
        }
        Self
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory source, used for tests and for embedding the pipeline
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a key/value pair
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_map_source_lookup() {
        let source = MapSource::new().with("OPENAI_API_KEY", "sk-test");
        assert_eq!(source.get("OPENAI_API_KEY"), Some("sk-test".to_string()));
        assert_eq!(source.get("MISSING"), None);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let source = MapSource::new().with("KEY", "   ");
        assert_eq!(source.get("KEY"), Some("   ".to_string()));
        assert_eq!(source.get_non_empty("KEY"), None);
        assert_eq!(source.get_or("KEY", "fallback"), "fallback");
    }

    #[test]
    fn test_from_iterator() {
        let source: MapSource = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(source.get_or("A", "x"), "1");
        assert_eq!(source.get_or("C", "x"), "x");
    }

    #[test]
    fn test_env_source_reads_dotenv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "AGENT_UTILS_DOTENV_TEST=from-file").unwrap();

        let source = EnvSource::with_dotenv_file(file.path());
        assert_eq!(
            source.get("AGENT_UTILS_DOTENV_TEST"),
            Some("from-file".to_string())
        );
    }
}
