//! Error types for browsy-tools

use thiserror::Error;

/// Tool error type
#[derive(Debug, Error)]
pub enum Error {
    /// Engine failure, passed through untranslated
    #[error(transparent)]
    Engine(#[from] browsy_engine::Error),

    /// Tool not found
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
