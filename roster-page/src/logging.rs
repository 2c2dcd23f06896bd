//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::{PageError, Result};

fn env_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| PageError::Logging(e.to_string()))
}

/// Install a human-readable fmt subscriber. `RUST_LOG` overrides `level`.
///
/// # Errors
/// Returns `PageError::Logging` if `level` is not a valid filter or a global
/// subscriber is already installed.
pub fn init(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_target(false)
        .try_init()
        .map_err(|e| PageError::Logging(e.to_string()))
}

/// Install a JSON fmt subscriber, for hosts that ship logs elsewhere.
///
/// # Errors
/// Same as [`init`].
pub fn init_json(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(level)?)
        .try_init()
        .map_err(|e| PageError::Logging(e.to_string()))
}
