//! Error types for the stylus library.
//!
//! Only the I/O boundary can fail. Tokenizing, structuring and aligning
//! always produce a best-effort result.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for stylus operations.
#[derive(Debug, Error)]
pub enum StylusError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be turned into a record.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no rows to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error saving or loading a report.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for stylus operations.
pub type Result<T> = std::result::Result<T, StylusError>;
