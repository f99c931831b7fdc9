//! Error types for rusty-sql.

use thiserror::Error;

/// Main error type for rusty-sql operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error turning a file into a table
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Error during SQL query execution
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Malformed configuration file
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a dataset into a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// File extension outside the supported set.
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    /// The decoder rejected the content. Carries its message as-is.
    #[error("{0}")]
    LoadFailed(String),
}

impl From<arrow::error::ArrowError> for LoadError {
    fn from(err: arrow::error::ArrowError) -> Self {
        LoadError::LoadFailed(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for LoadError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        LoadError::LoadFailed(err.to_string())
    }
}

impl From<calamine::XlsxError> for LoadError {
    fn from(err: calamine::XlsxError) -> Self {
        LoadError::LoadFailed(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::LoadFailed(err.to_string())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::LoadFailed(err.to_string())
    }
}

/// Errors related to SQL query execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The engine failed to plan or execute the statement.
    #[error("{0}")]
    QueryFailed(String),
}

impl From<datafusion::error::DataFusionError> for QueryError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        QueryError::QueryFailed(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for QueryError {
    fn from(err: arrow::error::ArrowError) -> Self {
        QueryError::QueryFailed(err.to_string())
    }
}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        QueryError::QueryFailed(err.to_string())
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
