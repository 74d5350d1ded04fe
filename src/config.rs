//! Persisted ticker code
//!
//! The config file holds a single line: the market-prefixed ticker code.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::TickerCode;

/// Ticker used when nothing has been saved yet
pub const DEFAULT_TICKER: &str = "sh600000";

const APP_DIR: &str = "stockbar";
const CONFIG_FILE: &str = "config.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads and writes the ticker code file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the platform config directory
    pub fn new() -> Self {
        Self::at(default_path())
    }

    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved ticker, falling back to [`DEFAULT_TICKER`]
    pub fn load(&self) -> TickerCode {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let code = contents.trim();
                if code.is_empty() {
                    TickerCode::new(DEFAULT_TICKER)
                } else {
                    TickerCode::new(code)
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using default", self.path.display());
                TickerCode::new(DEFAULT_TICKER)
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                TickerCode::new(DEFAULT_TICKER)
            }
        }
    }

    /// Overwrite the config file with exactly `code`
    pub fn save(&self, code: &TickerCode) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        fs::write(&self.path, code.as_str()).map_err(io_err)?;

        tracing::info!("Saved ticker {} to {}", code, self.path.display());
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn default_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR).join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("config.txt"));
        assert_eq!(store.load().as_str(), DEFAULT_TICKER);
    }

    #[test]
    fn test_load_empty_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(ConfigStore::at(&path).load().as_str(), DEFAULT_TICKER);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");

        ConfigStore::at(&path).save(&TickerCode::new("sz300750")).unwrap();

        // A fresh store sees what the previous one wrote
        let reloaded = ConfigStore::at(&path).load();
        assert_eq!(reloaded.as_str(), "sz300750");
        assert_eq!(fs::read_to_string(&path).unwrap(), "sz300750");
    }

    #[test]
    fn test_save_overwrites_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.txt");
        let store = ConfigStore::at(&path);

        store.save(&TickerCode::new("sh600000")).unwrap();
        store.save(&TickerCode::new("sz000001")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "sz000001");
    }

    #[test]
    fn test_load_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "sh601318\n").unwrap();
        assert_eq!(ConfigStore::at(&path).load().as_str(), "sh601318");
    }

    #[test]
    fn test_malformed_code_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "whatever").unwrap();
        assert_eq!(ConfigStore::at(&path).load().as_str(), "whatever");
    }
}
