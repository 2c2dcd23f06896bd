//! # roster-source: Member Data Sources
//!
//! Loads the member array a directory page is built from:
//!   - **HTTP(S)**: a GET against a configured URL (reqwest)
//!   - **File**: a JSON file on disk, for local pages and tests
//!
//! Any transport failure or non-success status is a fetch error; a body that
//! is not a JSON array of member records is a parse error. Neither is retried:
//! the page initializer treats both as terminal for the session.

pub mod client;
pub mod error;

pub use client::{parse_payload, MemberSource, SourceClient};
pub use error::SourceError;
