//! Error types for browsy-engine

use crate::page::ElementId;
use thiserror::Error;

/// Engine error type
#[derive(Debug, Error)]
pub enum Error {
    /// URL could not be parsed or joined
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// URL scheme is not allowed by the engine configuration
    #[error("blocked url: {0}")]
    BlockedUrl(String),

    /// Transport level failure
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("http error: status {0}")]
    Http(u16),

    /// Response body exceeded the configured limit
    #[error("response too large: {0} bytes (limit {1})")]
    ResponseTooLarge(u64, usize),

    /// No element with this id on the current page
    #[error("element {0} not found")]
    ElementNotFound(ElementId),

    /// Action is not applicable to the target
    #[error("action failed: {0}")]
    Action(String),

    /// Operation needs a loaded page
    #[error("no page loaded")]
    NoPage,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
