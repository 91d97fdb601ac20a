//! Error types for the placeaudit library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for placeaudit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON document on disk that failed to parse.
    #[error("Invalid JSON in '{path}': {source}")]
    JsonAt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No records to audit.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Path that does not exist.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Run id without a scraped dataset.
    #[error("Dataset not found: {} (run the scraper for '{run_id}' first)", .path.display())]
    DatasetNotFound { path: PathBuf, run_id: String },

    /// Directory without any `.json` file.
    #[error("No .json files found in '{}'", .0.display())]
    NoJsonFiles(PathBuf),

    /// Run settings document that is missing required fields.
    #[error("Invalid run settings: {0}")]
    InvalidSettings(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook answered with a non-success status.
    #[error("Webhook returned HTTP {status}: {body}")]
    Webhook { status: u16, body: String },
}

impl AuditError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AuditError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for placeaudit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
