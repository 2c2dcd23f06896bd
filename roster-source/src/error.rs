//! Source error types.

use thiserror::Error;

/// Errors that can occur while loading member records.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The transport failed (connection refused, DNS, unreadable file, ...).
    #[error("Member fetch failed: {0}")]
    Fetch(String),

    /// The server answered with a non-success status.
    #[error("Member fetch returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete in time.
    #[error("Member fetch timed out after {0}ms")]
    Timeout(u64),

    /// The payload was not a JSON array of member records.
    #[error("Failed to parse member payload: {0}")]
    Parse(String),
}

impl SourceError {
    /// Whether this is a payload problem rather than a transport problem.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout(0)
        } else if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
            }
        } else {
            SourceError::Fetch(err.to_string())
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Fetch(err.to_string())
    }
}
