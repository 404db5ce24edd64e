//! Error types for the Concord library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Concord operations.
#[derive(Debug, Error)]
pub enum ConcordError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed input that the CSV layer accepted but Concord cannot use.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Empty file or no data to compare.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The UI and reference tables share no usable columns, or one side
    /// is empty. Both column lists are carried for diagnostics.
    #[error("Column mismatch between UI and reference. UI columns: {ui_columns:?}, reference columns: {reference_columns:?}")]
    SchemaMismatch {
        ui_columns: Vec<String>,
        reference_columns: Vec<String>,
    },

    /// The external rendering surface did not produce the expected element
    /// within its deadline. Never retried.
    #[error("Timed out after {secs}s waiting for {waiting_for}")]
    Timeout { waiting_for: String, secs: u64 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Concord operations.
pub type Result<T> = std::result::Result<T, ConcordError>;
