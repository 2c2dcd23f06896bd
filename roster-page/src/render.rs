//! Render coordinator: turns filter results into section contents.
//!
//! Department sections and the search results list are rebuilt from scratch on
//! every render. A section that ends up empty shows a fallback message and has
//! its click listener detached; a non-empty one has it (re-)attached. Sections
//! never affect each other.

use tracing::debug;

use roster_core::config::RosterConfig;
use roster_core::display::MemberCard;
use roster_core::types::{Department, Member};

use crate::dom::{classes, ids, Card, Document, Image, Node};
use crate::listeners::{slots, ListenerRegistry, Section};

/// Alt-text prefix that marks search-result images.
pub const SEARCH_ALT_PREFIX: &str = "search-";

/// Build the card node for one member.
#[must_use]
pub fn card_node(member: &Member, default_pic: &str, search: bool) -> Card {
    let card = MemberCard::from_member(member, default_pic);
    let alt = if search {
        format!("{SEARCH_ALT_PREFIX}{}", card.full_name)
    } else {
        card.full_name.clone()
    };
    Card {
        member_id: card.id,
        year: if search { card.appointed_on } else { None },
        image: Image::lazy(card.img_src, alt, default_pic),
        full_name: card.full_name,
        position: card.position,
        year_range: card.year_range,
    }
}

/// Renders into a document, keeping listener state in step.
pub struct Renderer<'a> {
    doc: &'a mut Document,
    listeners: &'a mut ListenerRegistry,
    config: &'a RosterConfig,
}

impl<'a> Renderer<'a> {
    /// Borrow the pieces a render touches.
    pub fn new(doc: &'a mut Document, listeners: &'a mut ListenerRegistry, config: &'a RosterConfig) -> Self {
        Self { doc, listeners, config }
    }

    /// Rebuild every department section from `results`.
    pub fn render_members_list(&mut self, results: &[&Member]) {
        let config = self.config;
        let default_pic = config.assets.default_profile_pic.as_str();

        for dept in Department::ALL {
            let container = dept.container_id();
            self.doc.remove_class(container, classes::LOADING);
            self.doc.clear_children(container);

            let mut count = 0;
            for member in results.iter().filter(|m| m.department() == Some(dept)) {
                self.doc.append(container, Node::Card(card_node(member, default_pic, false)));
                count += 1;
            }

            let section = Section::Department(dept);
            if !self.assert_is_empty(count, section, &config.messages.no_results) {
                self.listeners.set_listener(self.doc, section, slots::CLICK, true);
            }
            debug!(department = %dept, count, "Section rendered");
        }
    }

    /// Rebuild the search results list from `results`.
    pub fn render_search_members_list(&mut self, results: &[&Member]) {
        let config = self.config;
        let default_pic = config.assets.default_profile_pic.as_str();
        let container = ids::SEARCH_RESULTS;

        self.doc.clear_children(container);
        for member in results {
            self.doc.append(container, Node::Card(card_node(member, default_pic, true)));
        }

        self.set_loading(Section::Search, false);
        if !self.assert_is_empty(results.len(), Section::Search, &config.messages.no_results) {
            self.listeners.set_listener(self.doc, Section::Search, slots::CLICK, true);
        }
        debug!(count = results.len(), "Search results rendered");
    }

    /// Show `message` and detach the section's click listener when `count`
    /// is zero. Returns whether the section was empty.
    pub fn assert_is_empty(&mut self, count: usize, section: Section, message: &str) -> bool {
        if count > 0 {
            return false;
        }
        self.render_message(section, message, false);
        self.listeners.set_listener(self.doc, section, slots::CLICK, false);
        true
    }

    /// Replace a section's contents with a single message.
    pub fn render_message(&mut self, section: Section, text: &str, is_error: bool) {
        if let Some(container) = section.container_id() {
            self.doc.set_message(container, text, is_error);
        }
    }

    /// Show the fetch error in every department section.
    pub fn render_error(&mut self) {
        let config = self.config;
        for dept in Department::ALL {
            self.doc.remove_class(dept.container_id(), classes::LOADING);
            self.render_message(Section::Department(dept), &config.messages.fetch_error, true);
        }
    }

    /// Toggle a section's loading indicator.
    pub fn set_loading(&mut self, section: Section, on: bool) {
        if let Some(container) = section.container_id() {
            if on {
                self.doc.add_class(container, classes::LOADING);
            } else {
                self.doc.remove_class(container, classes::LOADING);
            }
        }
    }
}
