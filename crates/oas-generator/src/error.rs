//! Error types for the generation pipeline

use thiserror::Error;

/// Result type alias for generator operations
pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

/// Generator error types
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Invalid directory token: {0}")]
    InvalidDirToken(String),

    #[error("Schema component name collision: {0}")]
    NamingCollision(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] oasdump_core::DumpError),
}
