//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the legal search engine,
//! supporting TOML files and environment variable overrides with validation
//! and type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use unified_legal_search::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Document store settings
    pub store: StoreConfig,
    /// Search defaults and limits
    pub search: SearchConfig,
    /// Snippet highlighting defaults
    pub highlight: HighlightConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of HTTP worker threads
    pub workers: usize,
    /// Enable CORS
    pub enable_cors: bool,
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one JSON file per collection
    /// (sc_cases.json, hc_cases.json, central_acts.json, state_acts.json)
    pub data_dir: PathBuf,
    /// Per-call timeout for count/fetch operations, in milliseconds
    pub query_timeout_ms: u64,
}

/// Search defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size used when the caller does not supply one
    pub default_page_size: u32,
    /// Upper bound on caller-supplied page sizes
    pub max_page_size: u32,
}

/// Snippet highlighting defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Maximum snippets returned per document
    pub max_snippets_per_doc: usize,
    /// Characters of context kept on each side of a keyword match
    pub snippet_window: usize,
}

/// Logging and monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| SearchError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| SearchError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("LEGAL_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("LEGAL_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| SearchError::Config {
                message: "Invalid port number in LEGAL_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(data_dir) = std::env::var("LEGAL_SEARCH_DATA_DIR") {
            self.store.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(level) = std::env::var("LEGAL_SEARCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SearchError::Config {
                message: "server.port cannot be zero".to_string(),
            });
        }

        if self.search.default_page_size == 0 {
            return Err(SearchError::Config {
                message: "search.default_page_size must be at least 1".to_string(),
            });
        }

        if self.search.max_page_size < self.search.default_page_size {
            return Err(SearchError::Config {
                message: "search.max_page_size cannot be below default_page_size".to_string(),
            });
        }

        if self.store.query_timeout_ms == 0 {
            return Err(SearchError::Config {
                message: "store.query_timeout_ms must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SearchError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: num_cpus::get(),
                enable_cors: true,
            },
            store: StoreConfig {
                data_dir: PathBuf::from("./data"),
                query_timeout_ms: 30_000,
            },
            search: SearchConfig {
                default_page_size: 20,
                max_page_size: 200,
            },
            highlight: HighlightConfig {
                max_snippets_per_doc: 3,
                snippet_window: 120,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.default_page_size, 20);
    }

    #[test]
    fn test_from_file_round_trip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded.server.port, config.server.port);
        assert_eq!(loaded.store.query_timeout_ms, config.store.query_timeout_ms);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = Config::default();
        config.search.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::from_file("/nonexistent/config.toml").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
