//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the legal search engine, providing
//! structured error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from configuration, store access, and
//!   request validation
//! - **Output**: Structured error types with context
//! - **Error Categories**: Configuration, Store, Search, API
//!
//! ## Propagation policy
//! Only configuration errors (fatal at startup) and source-query errors
//! (fatal per request, naming the failing source) terminate anything.
//! Label-listing failures degrade to static fallbacks, and unparsable
//! user input simply contributes no filter clause; neither surfaces here.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error types for the legal search engine
#[derive(Debug, Error)]
pub enum SearchError {
    /// Required configuration missing or invalid; fatal at startup
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A count or fetch against one participating source failed. Fatal for
    /// the request; no partial page is fabricated.
    #[error("Source query against '{src}' failed: {details}")]
    SourceQuery { src: String, details: String },

    /// A store call exceeded the per-request timeout
    #[error("Source query against '{src}' timed out after {timeout_ms}ms")]
    SourceTimeout { src: String, timeout_ms: u64 },

    /// Request parameters violate an invariant (page >= 1, page_size >= 1)
    #[error("Invalid search request: {field} - {reason}")]
    InvalidRequest { field: String, reason: String },

    /// Low-level store failure not yet attributed to a source
    #[error("Document store error: {details}")]
    Store { details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SearchError {
    /// Error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            SearchError::Config { .. } => "configuration",
            SearchError::SourceQuery { .. }
            | SearchError::SourceTimeout { .. }
            | SearchError::Store { .. } => "store",
            SearchError::InvalidRequest { .. } => "request",
            SearchError::Internal { .. }
            | SearchError::Json(_)
            | SearchError::Toml(_) => "internal",
        }
    }

    /// Whether the failure concerns the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::InvalidRequest { .. })
    }

    /// Attribute a raw store failure to the source it was issued against.
    pub fn for_source(self, source: &str) -> SearchError {
        match self {
            SearchError::Store { details } => SearchError::SourceQuery {
                src: source.to_string(),
                details,
            },
            other => other,
        }
    }
}

impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_source_attributes_store_errors() {
        let err = SearchError::Store {
            details: "connection reset".to_string(),
        }
        .for_source("sc_cases");
        match err {
            SearchError::SourceQuery { src, .. } => assert_eq!(src, "sc_cases"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_categories() {
        let err = SearchError::InvalidRequest {
            field: "page".to_string(),
            reason: "must be >= 1".to_string(),
        };
        assert_eq!(err.category(), "request");
        assert!(err.is_client_error());
    }
}
