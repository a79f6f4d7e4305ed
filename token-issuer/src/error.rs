//! Error types for the token issuer

use thiserror::Error;

/// Result type for issuer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Issuer errors
#[derive(Error, Debug)]
pub enum Error {
    /// Repository error
    #[error("Store error: {0}")]
    Store(String),

    /// Event publication error
    #[error("Publish error: {0}")]
    Publish(#[from] event_router::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

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
