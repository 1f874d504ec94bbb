//! Per-symbol history persistence
//!
//! The store is a single JSON object mapping symbol to the most recent
//! history summary. It is read whole and replaced whole through a temporary
//! file in the same directory. There is no lock, so concurrent runs race and
//! the last writer wins.

use crate::error::{Result, StockError};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

type HistoryMap = BTreeMap<String, String>;

/// JSON-file backed history store
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored history for each symbol, `None` where there is none
    ///
    /// A missing or unreadable file counts as an empty store.
    pub fn load(&self, symbols: &[String]) -> Vec<Option<String>> {
        let mut map = self.read_or_empty();
        symbols.iter().map(|symbol| map.remove(symbol)).collect()
    }

    /// Overwrite the entries for `symbols` with `results`, logging any failure
    pub fn save(&self, symbols: &[String], results: &[String]) {
        if let Err(e) = self.try_save(symbols, results) {
            error!("Failed to update history file: {}", e);
        }
    }

    /// Overwrite the entries for `symbols` with `results`
    ///
    /// Entries for other symbols are kept. An existing file that cannot be
    /// read or parsed is left untouched and the save fails. The parent
    /// directory is created if needed.
    pub fn try_save(&self, symbols: &[String], results: &[String]) -> Result<()> {
        let mut map = self.read()?;
        for (symbol, result) in symbols.iter().zip(results) {
            map.insert(symbol.clone(), result.clone());
        }

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let body = serde_json::to_string_pretty(&map)?;
        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        file.write_all(body.as_bytes()).map_err(|e| self.io_error(e))?;
        file.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        debug!("Wrote {} history entries to {}", map.len(), self.path.display());
        Ok(())
    }

    fn read_or_empty(&self) -> HistoryMap {
        match self.read() {
            Ok(map) => map,
            Err(e) => {
                warn!("Failed to read history file, starting empty: {}", e);
                HistoryMap::new()
            }
        }
    }

    fn read(&self) -> Result<HistoryMap> {
        if !self.path.exists() {
            return Ok(HistoryMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn io_error(&self, source: std::io::Error) -> StockError {
        StockError::HistoryIo {
            path: self.path.display().to_string(),
            source,
        }
    }
}
