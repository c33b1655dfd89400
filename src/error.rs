//! Error types for the midievent library

use std::io;

/// Library error type for midievent operations
#[derive(Debug, thiserror::Error)]
pub enum MidiEventError {
    /// Missing, non-numeric or out of range input
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Operation not applicable to the event type
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Position could not be resolved to ticks
    #[error("unresolved position: {0}")]
    UnresolvedPosition(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for MidiEventError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
