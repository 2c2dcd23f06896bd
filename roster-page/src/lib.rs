//! # Roster Page
//!
//! The board directory page, modelled over an in-memory document so every
//! behaviour can be driven and inspected without a browser.
//!
//! - [`dom`]: elements, cards, messages, focus and the listener table
//! - [`listeners`]: idempotent attach/detach of every page listener
//! - [`render`]: department and search result rendering with empty states
//! - [`overlay`]: the single detail overlay and its close transition
//! - [`search`]: debounced name search, focus state, year controls
//! - [`session`]: [`BoardPage`], initialisation and event dispatch
//! - [`slideshow`]: the hero banner carousel
//! - [`logging`]: tracing subscriber setup
//!
//! ```no_run
//! # async fn run() -> roster_page::error::Result<()> {
//! use roster_core::RosterConfig;
//! use roster_page::{dom::Document, BoardPage, PageEvent};
//!
//! let config = RosterConfig::default();
//! roster_page::logging::init(&config.general.log_level)?;
//! let page = BoardPage::initialize_from_config(config, Document::board_page()).await?;
//! page.dispatch(PageEvent::input("search__here", "anil"));
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dom;
pub mod error;
pub mod events;
pub mod listeners;
pub mod logging;
pub mod overlay;
pub mod render;
pub mod search;
pub mod session;
pub mod slideshow;

pub use dom::Document;
pub use error::PageError;
pub use events::{ClickTarget, Key, PageEvent};
pub use listeners::{ListenerRegistry, Section};
pub use overlay::OverlayPhase;
pub use session::{BoardPage, PageState, PageStatus};
pub use slideshow::Slideshow;
