//! Error types for the pvmover crate

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running concurrent moves
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A move of this source device is already running
    #[error("Move already in progress for device: {device}")]
    MoveInProgress { device: String },

    /// The move operation failed
    #[error("Move failed for device {device}: {reason}")]
    MoveFailed { device: String, reason: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
