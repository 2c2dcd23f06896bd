//! Listener lifecycle.
//!
//! Every listener the page ever attaches is described up front in a
//! [`ListenerRegistry`], grouped by [`Section`] and addressed by slot. Each
//! descriptor is either `Detached` or `Attached`; [`ListenerRegistry::set_listener`]
//! is the only way to move between the two, and asking for the state a
//! descriptor is already in does nothing. That makes re-renders safe to repeat
//! without stacking duplicate handlers.

use std::collections::HashMap;

use tracing::{trace, warn};

use roster_core::types::Department;

use crate::dom::{ids, Document, ElementId, EventKind, Handler};

/// Slot numbers within each section.
pub mod slots {
    /// Click on a department list or the search results list.
    pub const CLICK: usize = 0;
    /// Search field input.
    pub const SEARCH_INPUT: usize = 1;
    /// Focus entering the search container.
    pub const SEARCH_FOCUS_IN: usize = 2;
    /// Focus leaving the search container.
    pub const SEARCH_FOCUS_OUT: usize = 3;
    /// Overlay close button.
    pub const OVERLAY_CLOSE: usize = 0;
    /// Overlay closing transition.
    pub const OVERLAY_TRANSITION: usize = 1;
    /// Year select change.
    pub const YEAR_CHANGE: usize = 0;
    /// Global key presses.
    pub const KEYBOARD: usize = 1;
}

/// A group of listeners that is rendered or toggled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// One department list.
    Department(Department),
    /// Search field and results.
    Search,
    /// Detail overlay.
    Overlay,
    /// Page-wide controls.
    Controls,
}

impl Section {
    /// Id of the list element this section renders into, if it has one.
    #[must_use]
    pub fn container_id(self) -> Option<&'static str> {
        match self {
            Self::Department(dept) => Some(dept.container_id()),
            Self::Search => Some(ids::SEARCH_RESULTS),
            Self::Overlay => Some(ids::OVERLAY),
            Self::Controls => None,
        }
    }
}

/// Whether a descriptor's handler is currently on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerState {
    /// Not attached.
    #[default]
    Detached,
    /// Attached.
    Attached,
}

/// One listener the page may attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerDescriptor {
    /// Current state.
    pub state: ListenerState,
    /// Element the handler is attached to.
    pub target: ElementId,
    /// Event type.
    pub event: EventKind,
    /// Behaviour invoked.
    pub handler: Handler,
}

impl ListenerDescriptor {
    fn new(target: &str, event: EventKind, handler: Handler) -> Self {
        Self {
            state: ListenerState::Detached,
            target: ElementId::new(target),
            event,
            handler,
        }
    }
}

/// All listener descriptors of a page.
#[derive(Debug, Clone)]
pub struct ListenerRegistry {
    sections: HashMap<Section, Vec<ListenerDescriptor>>,
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::board_page()
    }
}

impl ListenerRegistry {
    /// The listener table of the board directory page. Everything starts
    /// detached.
    #[must_use]
    pub fn board_page() -> Self {
        let mut sections = HashMap::new();

        for dept in Department::ALL {
            sections.insert(
                Section::Department(dept),
                vec![ListenerDescriptor::new(dept.container_id(), EventKind::Click, Handler::OpenOverlay)],
            );
        }

        sections.insert(
            Section::Search,
            vec![
                ListenerDescriptor::new(ids::SEARCH_RESULTS, EventKind::Click, Handler::SelectResultYear),
                ListenerDescriptor::new(ids::SEARCH_INPUT, EventKind::Input, Handler::SearchInput),
                ListenerDescriptor::new(ids::SEARCH_CONTROLS, EventKind::FocusIn, Handler::SearchFocusIn),
                ListenerDescriptor::new(ids::SEARCH_CONTROLS, EventKind::FocusOut, Handler::SearchFocusOut),
            ],
        );

        sections.insert(
            Section::Overlay,
            vec![
                ListenerDescriptor::new(ids::OVERLAY_CLOSE, EventKind::Click, Handler::CloseOverlay),
                ListenerDescriptor::new(ids::OVERLAY, EventKind::TransitionEnd, Handler::OverlayTransitionEnd),
            ],
        );

        sections.insert(
            Section::Controls,
            vec![
                ListenerDescriptor::new(ids::YEAR_SELECT, EventKind::Change, Handler::YearSelected),
                ListenerDescriptor::new(ids::DOCUMENT, EventKind::KeyDown, Handler::KeyDown),
            ],
        );

        Self { sections }
    }

    /// Move the listener at `(section, slot)` to `enable`d or disabled.
    ///
    /// Returns `true` if the document changed. Requesting the current state is
    /// a no-op; an unknown slot is logged and ignored.
    pub fn set_listener(&mut self, doc: &mut Document, section: Section, slot: usize, enable: bool) -> bool {
        let Some(desc) = self.sections.get_mut(&section).and_then(|s| s.get_mut(slot)) else {
            warn!(?section, slot, "No listener registered for slot");
            return false;
        };

        let wanted = if enable {
            ListenerState::Attached
        } else {
            ListenerState::Detached
        };
        if desc.state == wanted {
            return false;
        }

        if enable {
            doc.add_listener(&desc.target, desc.event, desc.handler);
        } else {
            doc.remove_listener(&desc.target, desc.event, desc.handler);
        }
        desc.state = wanted;
        trace!(?section, slot, handler = ?desc.handler, enable, "Listener toggled");
        true
    }

    /// State of `(section, slot)`, `None` if no such slot.
    #[must_use]
    pub fn state(&self, section: Section, slot: usize) -> Option<ListenerState> {
        self.sections.get(&section).and_then(|s| s.get(slot)).map(|d| d.state)
    }

    /// Whether `(section, slot)` is attached.
    #[must_use]
    pub fn is_active(&self, section: Section, slot: usize) -> bool {
        self.state(section, slot) == Some(ListenerState::Attached)
    }

    /// Descriptors of one section.
    #[must_use]
    pub fn descriptors(&self, section: Section) -> &[ListenerDescriptor] {
        self.sections.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every element a listener can be attached to.
    pub fn targets(&self) -> impl Iterator<Item = &ElementId> {
        self.sections.values().flatten().map(|d| &d.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_is_idempotent() {
        let mut doc = Document::board_page();
        let mut reg = ListenerRegistry::board_page();
        let section = Section::Department(Department::YouthLeague);

        assert!(reg.set_listener(&mut doc, section, slots::CLICK, true));
        assert!(!reg.set_listener(&mut doc, section, slots::CLICK, true));
        assert_eq!(doc.listener_count(), 1);
        assert!(doc.has_listener("youth-league", EventKind::Click, Handler::OpenOverlay));
    }

    #[test]
    fn detach_when_detached_is_noop() {
        let mut doc = Document::board_page();
        let mut reg = ListenerRegistry::board_page();
        let before = doc.mutation_count();

        assert!(!reg.set_listener(&mut doc, Section::Search, slots::CLICK, false));
        assert_eq!(doc.mutation_count(), before);
    }

    #[test]
    fn attach_detach_cycle() {
        let mut doc = Document::board_page();
        let mut reg = ListenerRegistry::board_page();

        reg.set_listener(&mut doc, Section::Search, slots::SEARCH_INPUT, true);
        assert!(reg.is_active(Section::Search, slots::SEARCH_INPUT));
        reg.set_listener(&mut doc, Section::Search, slots::SEARCH_INPUT, false);
        assert_eq!(reg.state(Section::Search, slots::SEARCH_INPUT), Some(ListenerState::Detached));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn unknown_slot_is_ignored() {
        let mut doc = Document::board_page();
        let mut reg = ListenerRegistry::board_page();
        assert!(!reg.set_listener(&mut doc, Section::Overlay, 9, true));
        assert_eq!(reg.state(Section::Overlay, 9), None);
    }

    #[test]
    fn every_target_exists_on_board_page() {
        let doc = Document::board_page();
        let reg = ListenerRegistry::board_page();
        assert!(reg.targets().all(|t| doc.contains(t.as_str())));
    }

    #[test]
    fn section_containers() {
        assert_eq!(Section::Search.container_id(), Some(ids::SEARCH_RESULTS));
        assert_eq!(
            Section::Department(Department::SubCommittee).container_id(),
            Some("committee-convenors")
        );
        assert_eq!(Section::Controls.container_id(), None);
    }
}
