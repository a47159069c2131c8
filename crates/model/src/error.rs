//! Error types for the model crate.

use thiserror::Error;

/// Errors that can occur while loading provider or policy documents
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error occurred while reading file
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document was not valid JSON for the expected shape
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, LoadError>;
