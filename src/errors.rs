//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the zip code search service, providing
//! structured error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from ingestion, configuration, and the API
//! - **Output**: Structured error types with context
//! - **Error Categories**: Ingestion, Configuration, Validation, Internal
//!
//! ## Key Features
//! - Typed errors with detailed context via `thiserror`
//! - Automatic conversion from common library error types
//! - Category labels for structured logging
//!
//! Query misses are deliberately absent from this taxonomy: an unknown zip
//! code, state key, or city prefix is an empty result, never an error.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error types for the zip code search service
#[derive(Debug, Error)]
pub enum SearchError {
    /// Dataset file could not be opened or read
    #[error("Failed to read dataset {path}: {details}")]
    DatasetIo { path: String, details: String },

    /// A row in the record feed could not be parsed
    #[error("Failed to parse record from {feed}: {details}")]
    DataParsing { feed: String, details: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SearchError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            SearchError::DatasetIo { .. } | SearchError::DataParsing { .. } => "ingestion",
            SearchError::Config { .. } => "configuration",
            SearchError::ValidationFailed { .. } => "validation",
            SearchError::Internal { .. } => "internal",
        }
    }

    /// Whether the error is fatal to the build phase.
    ///
    /// Ingestion failures always are: no partial index is ever exposed to
    /// queries, and the build is not retried internally.
    pub fn is_build_fatal(&self) -> bool {
        matches!(
            self,
            SearchError::DatasetIo { .. } | SearchError::DataParsing { .. }
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<toml::de::Error> for SearchError {
    fn from(err: toml::de::Error) -> Self {
        SearchError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = SearchError::DataParsing {
            feed: "zipcodes.csv".to_string(),
            details: "missing column".to_string(),
        };
        assert_eq!(err.category(), "ingestion");
        assert!(err.is_build_fatal());

        let err = SearchError::Config {
            message: "bad port".to_string(),
        };
        assert_eq!(err.category(), "configuration");
        assert!(!err.is_build_fatal());
    }
}
