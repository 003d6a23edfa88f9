//! Error types for the core crate

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Core error types
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Invalid capture record: {0}")]
    InvalidRecord(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
