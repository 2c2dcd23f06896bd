//! # Roster Core Library
//!
//! DOM-free heart of the member directory. Everything a page needs to decide
//! *what* to show lives here; the page crate only decides *where*.
//!
//! - [`MemberStore`]: insertion-ordered id → [`Member`] map, loaded once per session
//! - [`filter`]: year-range and name matching over a store snapshot
//! - [`display`]: raw member → card display shape
//! - [`debounce`]: keyed cancel-and-replace timers on the tokio runtime
//! - [`config`]: TOML-backed timings, messages and asset paths
//!
//! ## Filtering Contract
//!
//! Filters never re-sort: results come back in store iteration order.
//! There is no ranking and no index beyond the id map.

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod filter;
pub mod store;
pub mod types;

pub use config::RosterConfig;
pub use debounce::Debouncer;
pub use display::MemberCard;
pub use error::RosterError;
pub use filter::SearchQuery;
pub use store::MemberStore;
pub use types::*;
