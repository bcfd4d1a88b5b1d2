//! Error types and handling for lazy sequences
//!
//! Every driving operation returns a [`SeqResult`]. Errors raised inside a
//! producer chain travel outward to the terminal call that drove it, including
//! errors raised on a bridge worker thread.

use thiserror::Error;

/// Main error type for sequence operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqError {
    /// A decomposition (head, last, uncons, unsnoc) was applied to a sequence with no elements
    #[error("sequence is empty")]
    EmptySequence,
    /// An input adapter's underlying resource failed to open or read
    #[error("resource error: {0}")]
    Resource(String),
    /// A single-use producer was driven a second time
    #[error("single-use {0} was already consumed")]
    AlreadyConsumed(&'static str),
    /// An operator was configured with an argument it cannot work with
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A bridge worker thread panicked while driving its sequence
    #[error("bridge worker panicked: {0}")]
    WorkerPanicked(String),
    /// Caller-raised failure
    #[error("sequence error: {0}")]
    Custom(String),
}

impl SeqError {
    /// Build a [`SeqError::Custom`] from anything printable
    pub fn custom(msg: impl Into<String>) -> Self {
        SeqError::Custom(msg.into())
    }
}

impl From<std::io::Error> for SeqError {
    fn from(err: std::io::Error) -> Self {
        SeqError::Resource(err.to_string())
    }
}

/// Result type for sequence operations
pub type SeqResult<T> = Result<T, SeqError>;
