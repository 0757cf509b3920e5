//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the zip code search service, supporting
//! TOML files and environment variable overrides with validation and
//! type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (applied by the binary, highest priority)
//! 2. Environment variables
//! 3. Configuration files
//! 4. Default values (lowest priority)

use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Dataset ingestion settings
    pub ingestion: IngestionConfig,
    /// Search behavior settings
    pub search: SearchConfig,
    /// Logging configuration
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

/// Dataset ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Path to the delimited dataset file (plain or gzip-compressed)
    pub dataset_path: PathBuf,
    /// Field delimiter used by the dataset
    pub delimiter: char,
}

/// Search behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of city groups returned when the request does not
    /// specify one
    pub default_max_results: usize,
    /// Hard ceiling for the `max` query parameter
    pub max_results_limit: usize,
}

/// Logging configuration
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
        if let Ok(host) = std::env::var("ZIP_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ZIP_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| SearchError::Config {
                message: "Invalid port number in ZIP_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(data_path) = std::env::var("ZIP_SEARCH_DATA") {
            self.ingestion.dataset_path = PathBuf::from(data_path);
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SearchError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.server.workers == 0 {
            return Err(SearchError::ValidationFailed {
                field: "server.workers".to_string(),
                reason: "At least one worker is required".to_string(),
            });
        }

        if !self.ingestion.delimiter.is_ascii() {
            return Err(SearchError::ValidationFailed {
                field: "ingestion.delimiter".to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            });
        }

        if self.search.default_max_results == 0 {
            return Err(SearchError::ValidationFailed {
                field: "search.default_max_results".to_string(),
                reason: "Default result cap must be positive".to_string(),
            });
        }

        if self.search.default_max_results > self.search.max_results_limit {
            return Err(SearchError::ValidationFailed {
                field: "search.default_max_results".to_string(),
                reason: "Default result cap cannot exceed the limit".to_string(),
            });
        }

        Ok(())
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
            ingestion: IngestionConfig {
                dataset_path: PathBuf::from("data/zipcodes.csv"),
                delimiter: ',',
            },
            search: SearchConfig {
                default_max_results: 10,
                max_results_limit: 100,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}
