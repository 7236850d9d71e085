//! Error types for facetweb operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all facetweb crates. Uses `thiserror` for derive macros.
//!
//! Search backend failures get their own variants so that the graph builder
//! can degrade a single expansion branch instead of failing the request.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in facetweb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The search backend could not be reached or rejected the request.
    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The search backend answered, but without the requested facet data.
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    /// A generic operation failure.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(what: &str, name: impl AsRef<str>) -> Self {
        Self::NotFound(format!("{what}: {}", name.as_ref()))
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a backend-unavailable error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Create a malformed-response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Wrap an I/O error with the path that caused it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error came from the search backend.
    ///
    /// Both variants are recovered the same way: the affected expansion
    /// branch contributes no nodes.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable(_) | Self::MalformedResponse(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using facetweb's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_failure_classification() {
        assert!(Error::backend("timeout").is_backend_failure());
        assert!(Error::malformed("no facets").is_backend_failure());
        assert!(!Error::config("bad").is_backend_failure());
        assert!(!Error::operation("x").is_backend_failure());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::backend("connection refused").to_string(),
            "Search backend unavailable: connection refused"
        );
        assert_eq!(
            Error::not_found("Index", "/tmp/idx").to_string(),
            "Not found: Index: /tmp/idx"
        );
    }

    #[test]
    fn test_io_with_path_display() {
        let err = Error::io_with_path(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "/data/docs.jsonl",
        );
        let msg = err.to_string();
        assert!(msg.contains("/data/docs.jsonl"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
