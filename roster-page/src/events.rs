//! Page events: what the host delivers to [`crate::BoardPage::dispatch`].

use roster_core::types::MemberId;

use crate::dom::{ElementId, EventKind, ImageOutcome};

/// Keyboard keys the page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// `Escape`
    Escape,
    /// `ArrowLeft`
    ArrowLeft,
    /// `ArrowRight`
    ArrowRight,
    /// Anything else, by its key name.
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "Escape" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            other => Self::Other(other.to_string()),
        }
    }
}

/// What a click landed on inside a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The profile image of a card.
    CardImage(MemberId),
    /// Any other part of a card.
    Card(MemberId),
    /// The list itself, a message, or a non-list element.
    Background,
}

impl ClickTarget {
    /// The member whose card was hit, if any.
    #[must_use]
    pub fn member(self) -> Option<MemberId> {
        match self {
            Self::CardImage(id) | Self::Card(id) => Some(id),
            Self::Background => None,
        }
    }
}

/// An event delivered to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// Pointer click on `target`.
    Click {
        /// Element receiving the click.
        target: ElementId,
        /// What inside `target` was hit.
        hit: ClickTarget,
    },
    /// The text of an input changed to `value`.
    Input {
        /// Input element.
        target: ElementId,
        /// New text.
        value: String,
    },
    /// A select committed `value`.
    Change {
        /// Select element.
        target: ElementId,
        /// Selected value.
        value: String,
    },
    /// `target` gained focus.
    FocusIn {
        /// Focused element.
        target: ElementId,
    },
    /// `target` lost focus to `related` (or to nothing).
    FocusOut {
        /// Element losing focus.
        target: ElementId,
        /// Element receiving focus.
        related: Option<ElementId>,
    },
    /// A key was pressed anywhere on the page.
    KeyDown {
        /// Key pressed.
        key: Key,
    },
    /// A CSS transition on `target` finished.
    TransitionEnd {
        /// Element whose transition finished.
        target: ElementId,
    },
    /// A card image or the overlay image finished loading.
    Image {
        /// List element holding the card, or the overlay.
        container: ElementId,
        /// Member whose image it is.
        member: MemberId,
        /// Load outcome.
        outcome: ImageOutcome,
    },
}

impl PageEvent {
    /// Click on a card image inside `container`.
    #[must_use]
    pub fn click_image(container: &str, member: MemberId) -> Self {
        Self::Click {
            target: ElementId::new(container),
            hit: ClickTarget::CardImage(member),
        }
    }

    /// Click on a card (not its image) inside `container`.
    #[must_use]
    pub fn click_card(container: &str, member: MemberId) -> Self {
        Self::Click {
            target: ElementId::new(container),
            hit: ClickTarget::Card(member),
        }
    }

    /// Plain click on an element.
    #[must_use]
    pub fn click(target: &str) -> Self {
        Self::Click {
            target: ElementId::new(target),
            hit: ClickTarget::Background,
        }
    }

    /// Typing into an input.
    #[must_use]
    pub fn input(target: &str, value: &str) -> Self {
        Self::Input {
            target: ElementId::new(target),
            value: value.to_string(),
        }
    }

    /// A select change.
    #[must_use]
    pub fn change(target: &str, value: &str) -> Self {
        Self::Change {
            target: ElementId::new(target),
            value: value.to_string(),
        }
    }

    /// A key press.
    #[must_use]
    pub fn key(key: &str) -> Self {
        Self::KeyDown { key: Key::from(key) }
    }

    /// Listener type this event is delivered to, `None` for image outcomes
    /// which are watched per image rather than through the listener table.
    #[must_use]
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Click { .. } => Some(EventKind::Click),
            Self::Input { .. } => Some(EventKind::Input),
            Self::Change { .. } => Some(EventKind::Change),
            Self::FocusIn { .. } => Some(EventKind::FocusIn),
            Self::FocusOut { .. } => Some(EventKind::FocusOut),
            Self::KeyDown { .. } => Some(EventKind::KeyDown),
            Self::TransitionEnd { .. } => Some(EventKind::TransitionEnd),
            Self::Image { .. } => None,
        }
    }

    /// Element the event starts at. Key presses start at the document root.
    #[must_use]
    pub fn target(&self) -> ElementId {
        match self {
            Self::Click { target, .. }
            | Self::Input { target, .. }
            | Self::Change { target, .. }
            | Self::FocusIn { target }
            | Self::FocusOut { target, .. }
            | Self::TransitionEnd { target } => target.clone(),
            Self::KeyDown { .. } => ElementId::document(),
            Self::Image { container, .. } => container.clone(),
        }
    }
}
