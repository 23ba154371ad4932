//! Common error types for moodplay

use thiserror::Error;

/// Common result type for moodplay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading the playlist table or resolving configuration
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Playlist document is not valid JSON or has the wrong shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
