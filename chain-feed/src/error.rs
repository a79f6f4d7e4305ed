//! Error types for the chain feed

use thiserror::Error;

/// Result type for chain feed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chain feed errors
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream data source error
    #[error("Data source error: {0}")]
    Source(String),

    /// Event publication error
    #[error("Publish error: {0}")]
    Publish(#[from] event_router::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
