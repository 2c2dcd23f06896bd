//! Error types for the roster core library.

use thiserror::Error;

/// Top-level error type for core roster operations.
#[derive(Error, Debug)]
pub enum RosterError {
    /// Configuration could not be parsed or is out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A member record could not be decoded.
    #[error("Invalid member record: {0}")]
    InvalidRecord(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, RosterError>;
