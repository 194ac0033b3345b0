//! Common error types for the deck builder

use thiserror::Error;

/// Common result type for deck builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the workspace
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited table read/write error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required column is absent from an input table
    #[error("Missing column '{column}' in {source_name}")]
    MissingColumn { source_name: String, column: String },

    /// Input table violates its expected shape (duplicate keys, bad rows)
    #[error("Schema error: {0}")]
    Schema(String),

    /// A join or insert would produce more rows than its left side
    #[error("Cardinality error: {0}")]
    Cardinality(String),

    /// Transport-level failure that could not be absorbed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn missing_column(source_name: impl Into<String>, column: impl Into<String>) -> Self {
        Error::MissingColumn {
            source_name: source_name.into(),
            column: column.into(),
        }
    }
}
