//! Error types for the event router

use thiserror::Error;

/// Result type for router operations
pub type Result<T> = std::result::Result<T, Error>;

/// Router errors
#[derive(Error, Debug)]
pub enum Error {
    /// Payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Subscriber rejected an event
    #[error("Subscriber error: {0}")]
    Subscriber(String),

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
