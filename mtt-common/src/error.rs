//! Common error types for MTT

use thiserror::Error;

/// Common result type for MTT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MTT services
#[derive(Error, Debug)]
pub enum Error {
    /// Document store read/write failure ("store unavailable")
    #[error("Store unavailable: {0}")]
    Store(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spreadsheet import failure (input unreadable or malformed)
    #[error("Import error: {0}")]
    Import(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
