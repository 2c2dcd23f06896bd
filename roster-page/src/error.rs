//! Error types for the board page.

use roster_core::RosterError;
use thiserror::Error;

/// Errors raised while setting up a board page.
///
/// Member fetch failures are not errors at this level: they are rendered
/// into the page and reported through [`crate::PageStatus::Failed`].
#[derive(Error, Debug)]
pub enum PageError {
    /// The host document lacks an element the page wires listeners to.
    #[error("Required element '{0}' is missing from the document")]
    MissingElement(String),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] RosterError),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PageError>;
