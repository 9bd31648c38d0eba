//! Application configuration
//!
//! `config.json` holds the database name, the library roots, and the file
//! extensions worth indexing. A missing config file is created with
//! defaults on first load rather than treated as an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions indexed when the config does not name any
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "pdf", "epub", "mobi", "azw3", "djvu", "cbz", "cbr", "txt",
];

fn default_database() -> String {
    "library.db".to_string()
}

/// Errors from loading or saving the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Library configuration persisted as `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database file name
    #[serde(default = "default_database")]
    pub database: String,

    /// Directories to scan for documents
    #[serde(default)]
    pub roots: Vec<String>,

    /// Extensions to index; empty means [`DEFAULT_EXTENSIONS`]
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            roots: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load the config, creating a default file if none exists
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            log::info!("created default config at {}", path.display());
            return Ok(config);
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save the config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Lowercased, deduplicated extensions without leading dots
    pub fn normalized_extensions(&self) -> Vec<String> {
        let source: Vec<String> = if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.extensions.clone()
        };
        let mut exts: Vec<String> = source
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        exts.sort();
        exts.dedup();
        exts
    }

    /// Configured roots as paths, falling back to the current directory
    pub fn normalized_roots(&self) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            return std::env::current_dir().map(|d| vec![d]).unwrap_or_default();
        }
        self.roots.iter().map(PathBuf::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database, "library.db");
        assert!(config.roots.is_empty());
        assert_eq!(config.extensions.len(), DEFAULT_EXTENSIONS.len());
    }

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig {
            database: "books.db".to_string(),
            roots: vec!["/library".to_string()],
            extensions: vec!["pdf".to_string()],
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"roots": ["/books"]}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.database, "library.db");
        assert_eq!(config.roots, vec!["/books".to_string()]);
        assert!(config.extensions.is_empty());
        // Empty extension list falls back to the defaults.
        assert!(!config.normalized_extensions().is_empty());
    }

    #[test]
    fn test_normalized_extensions() {
        let config = AppConfig {
            database: default_database(),
            roots: Vec::new(),
            extensions: vec![
                ".PDF".to_string(),
                "epub".to_string(),
                "pdf".to_string(),
                "".to_string(),
            ],
        };
        assert_eq!(config.normalized_extensions(), vec!["epub", "pdf"]);
    }

    #[test]
    fn test_normalized_roots() {
        let config = AppConfig {
            database: default_database(),
            roots: vec!["/a".to_string(), "/b".to_string()],
            extensions: Vec::new(),
        };
        assert_eq!(
            config.normalized_roots(),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );

        // Empty roots fall back to the current directory.
        let fallback = AppConfig::default().normalized_roots();
        assert_eq!(fallback.len(), 1);
    }
}
