//! In-memory document model.
//!
//! A retained tree of named elements standing in for the browser DOM: class
//! lists, child nodes (member cards and status messages), input values, scroll
//! offsets, a focus pointer, the body scroll lock and the table of attached
//! event listeners. Every page component mutates this model and tests inspect
//! it directly.
//!
//! The listener table can only be changed from inside this crate; the
//! [`crate::listeners::ListenerRegistry`] is the one caller.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use roster_core::types::MemberId;

/// Well-known element ids of the board directory page.
pub mod ids {
    /// Root of every ancestry chain; global key handlers live here.
    pub const DOCUMENT: &str = "document";
    /// Page body.
    pub const BODY: &str = "body";
    /// Search bar wrapper; carries the `active` class while focused.
    pub const SEARCH_BAR: &str = "controls";
    /// Search container (input + results) watched for focus changes.
    pub const SEARCH_CONTROLS: &str = "controls__search";
    /// Search text input.
    pub const SEARCH_INPUT: &str = "search__here";
    /// Search results list.
    pub const SEARCH_RESULTS: &str = "search__results";
    /// Year filter wrapper.
    pub const YEAR_FILTER: &str = "year-filter";
    /// Year select control.
    pub const YEAR_SELECT: &str = "year-served";
    /// The single reusable member detail overlay.
    pub const OVERLAY: &str = "board-directory__overlay";
    /// Overlay close button.
    pub const OVERLAY_CLOSE: &str = "board-directory__overlay-close";
}

/// Class names toggled by the page.
pub mod classes {
    /// Section is waiting for data.
    pub const LOADING: &str = "load";
    /// Search bar has focus.
    pub const ACTIVE: &str = "active";
    /// Overlay is shown.
    pub const ACTIVE_OVERLAY: &str = "active-overlay";
}

// ---------------------------------------------------------------------------
// Identity & events
// ---------------------------------------------------------------------------

/// Id of an element in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an element id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The document root.
    #[must_use]
    pub fn document() -> Self {
        Self::new(ids::DOCUMENT)
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Event types a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer click.
    Click,
    /// Text input changed.
    Input,
    /// Select value committed.
    Change,
    /// Focus entered an element or its descendants.
    FocusIn,
    /// Focus left an element or its descendants.
    FocusOut,
    /// Key pressed.
    KeyDown,
    /// CSS transition finished.
    TransitionEnd,
}

/// The page behaviours a listener can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Open the detail overlay for the clicked card.
    OpenOverlay,
    /// Re-run the year filter with a search result's start year.
    SelectResultYear,
    /// Debounced name search.
    SearchInput,
    /// Mark the search bar active.
    SearchFocusIn,
    /// Clear the search bar's active state once focus has really left.
    SearchFocusOut,
    /// Re-run the year filter with the selected year.
    YearSelected,
    /// Global keyboard shortcuts.
    KeyDown,
    /// Close the detail overlay.
    CloseOverlay,
    /// Release the scroll lock after the overlay's closing transition.
    OverlayTransitionEnd,
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Outcome of an image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    /// The image loaded.
    Loaded,
    /// The image failed to load.
    Failed,
}

/// An image with a one-shot load/error watch.
///
/// Images pointing at the default asset are revealed immediately; any other
/// image waits for the first load or error outcome and ignores later ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Current source path.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    revealed: bool,
    armed: bool,
}

impl Image {
    /// Create a lazily revealed image.
    #[must_use]
    pub fn lazy(src: impl Into<String>, alt: impl Into<String>, default_src: &str) -> Self {
        let src = src.into();
        let is_default = src == default_src;
        Self {
            src,
            alt: alt.into(),
            revealed: is_default,
            armed: !is_default,
        }
    }

    /// Whether the image has been revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether the image still waits for a load or error outcome.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Apply a load outcome. A failed image swaps to `default_src`.
    /// Returns `false` if the watch already fired.
    pub fn settle(&mut self, outcome: ImageOutcome, default_src: &str) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        if outcome == ImageOutcome::Failed {
            self.src = default_src.to_string();
        }
        self.revealed = true;
        true
    }
}

/// A rendered member card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Member shown on this card.
    pub member_id: MemberId,
    /// Start year carried by search-result cards.
    pub year: Option<String>,
    /// Profile image.
    pub image: Image,
    /// Display name.
    pub full_name: String,
    /// Position line.
    pub position: String,
    /// Tenure label.
    pub year_range: String,
}

/// A status message occupying a list in place of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message text.
    pub text: String,
    /// Styled as an error.
    pub is_error: bool,
}

/// A child node of a list element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Member card.
    Card(Card),
    /// Status message.
    Message(Message),
}

impl Node {
    /// The card, if this node is one.
    #[must_use]
    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Self::Card(card) => Some(card),
            Self::Message(_) => None,
        }
    }

    /// The message, if this node is one.
    #[must_use]
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(msg) => Some(msg),
            Self::Card(_) => None,
        }
    }
}

/// One element of the document.
#[derive(Debug, Clone, Default)]
pub struct Element {
    parent: Option<ElementId>,
    classes: BTreeSet<String>,
    children: Vec<Node>,
    value: String,
    scroll_top: u32,
}

/// Content of the reusable detail overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayContent {
    /// Member currently shown.
    pub member_id: Option<MemberId>,
    /// Profile image.
    pub image: Option<Image>,
    /// Display name.
    pub full_name: String,
    /// Position line.
    pub position: String,
    /// Tenure label.
    pub year_range: String,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The whole page.
#[derive(Debug, Clone)]
pub struct Document {
    elements: HashMap<ElementId, Element>,
    listeners: HashMap<(ElementId, EventKind), Vec<Handler>>,
    overlay: OverlayContent,
    body_scroll_locked: bool,
    active: Option<ElementId>,
    mutations: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the root and the body.
    #[must_use]
    pub fn new() -> Self {
        let mut elements = HashMap::new();
        elements.insert(ElementId::document(), Element::default());
        elements.insert(
            ElementId::new(ids::BODY),
            Element {
                parent: Some(ElementId::document()),
                ..Element::default()
            },
        );
        Self {
            elements,
            listeners: HashMap::new(),
            overlay: OverlayContent::default(),
            body_scroll_locked: false,
            active: None,
            mutations: 0,
        }
    }

    /// The standard board directory page with every container it needs.
    #[must_use]
    pub fn board_page() -> Self {
        let mut doc = Self::new();
        doc.insert_element(ids::SEARCH_BAR, ids::BODY)
            .insert_element(ids::SEARCH_CONTROLS, ids::SEARCH_BAR)
            .insert_element(ids::SEARCH_INPUT, ids::SEARCH_CONTROLS)
            .insert_element(ids::SEARCH_RESULTS, ids::SEARCH_CONTROLS)
            .insert_element(ids::YEAR_FILTER, ids::BODY)
            .insert_element(ids::YEAR_SELECT, ids::YEAR_FILTER);
        for dept in roster_core::types::Department::ALL {
            doc.insert_element(dept.container_id(), ids::BODY);
            doc.add_class(dept.container_id(), classes::LOADING);
        }
        doc.insert_element(ids::OVERLAY, ids::BODY)
            .insert_element(ids::OVERLAY_CLOSE, ids::OVERLAY);
        doc.mutations = 0;
        doc
    }

    /// Add (or reset) an element under `parent`.
    pub fn insert_element(&mut self, id: &str, parent: &str) -> &mut Self {
        self.elements.insert(
            ElementId::new(id),
            Element {
                parent: Some(ElementId::new(parent)),
                ..Element::default()
            },
        );
        self.touch();
        self
    }

    /// Drop an element. Children keep their dangling parent link.
    pub fn remove_element(&mut self, id: &str) -> bool {
        let removed = self.elements.remove(&ElementId::new(id)).is_some();
        if removed {
            self.touch();
        }
        removed
    }

    /// Whether an element exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(&ElementId::new(id))
    }

    /// Number of mutations applied since the page skeleton was built.
    #[must_use]
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    fn touch(&mut self) {
        self.mutations += 1;
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(&ElementId::new(id))
    }

    fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(&ElementId::new(id))
    }

    // --- tree ---------------------------------------------------------------

    /// Parent of an element.
    #[must_use]
    pub fn parent(&self, id: &str) -> Option<&ElementId> {
        self.element(id).and_then(|e| e.parent.as_ref())
    }

    /// `id` followed by each of its ancestors up to the root.
    #[must_use]
    pub fn ancestry(&self, id: &str) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = Some(ElementId::new(id));
        while let Some(el) = current {
            if chain.contains(&el) || !self.elements.contains_key(&el) {
                break;
            }
            current = self.elements.get(&el).and_then(|e| e.parent.clone());
            chain.push(el);
        }
        chain
    }

    /// Whether `id` is `ancestor` or lies inside it.
    #[must_use]
    pub fn is_within(&self, id: &str, ancestor: &str) -> bool {
        self.ancestry(id).iter().any(|e| e.as_str() == ancestor)
    }

    // --- children -----------------------------------------------------------

    /// Child nodes of an element.
    #[must_use]
    pub fn children(&self, id: &str) -> &[Node] {
        self.element(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Cards inside an element.
    pub fn cards(&self, id: &str) -> impl Iterator<Item = &Card> {
        self.children(id).iter().filter_map(Node::as_card)
    }

    /// The first message inside an element.
    #[must_use]
    pub fn message(&self, id: &str) -> Option<&Message> {
        self.children(id).iter().find_map(Node::as_message)
    }

    /// Remove all child nodes.
    pub fn clear_children(&mut self, id: &str) {
        if let Some(el) = self.element_mut(id) {
            el.children.clear();
            self.touch();
        }
    }

    /// Append a child node.
    pub fn append(&mut self, id: &str, node: Node) {
        if let Some(el) = self.element_mut(id) {
            el.children.push(node);
            self.touch();
        }
    }

    /// Replace all child nodes with one message.
    pub fn set_message(&mut self, id: &str, text: &str, is_error: bool) {
        if let Some(el) = self.element_mut(id) {
            el.children = vec![Node::Message(Message {
                text: text.to_string(),
                is_error,
            })];
            self.touch();
        }
    }

    // --- classes ------------------------------------------------------------

    /// Whether an element carries a class.
    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.contains(class))
    }

    /// Add a class.
    pub fn add_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.insert(class.to_string());
            self.touch();
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.remove(class);
            self.touch();
        }
    }

    // --- values & scroll ----------------------------------------------------

    /// Value of an input or select; empty for unknown elements.
    #[must_use]
    pub fn value(&self, id: &str) -> &str {
        self.element(id).map_or("", |e| e.value.as_str())
    }

    /// Set the value of an input or select.
    pub fn set_value(&mut self, id: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.value = value.to_string();
            self.touch();
        }
    }

    /// Vertical scroll offset.
    #[must_use]
    pub fn scroll_top(&self, id: &str) -> u32 {
        self.element(id).map_or(0, |e| e.scroll_top)
    }

    /// Set the vertical scroll offset.
    pub fn set_scroll_top(&mut self, id: &str, offset: u32) {
        if let Some(el) = self.element_mut(id) {
            el.scroll_top = offset;
            self.touch();
        }
    }

    /// Whether page-body scrolling is suppressed.
    #[must_use]
    pub fn body_scroll_locked(&self) -> bool {
        self.body_scroll_locked
    }

    /// Suppress or restore page-body scrolling.
    pub fn set_body_scroll_locked(&mut self, locked: bool) {
        self.body_scroll_locked = locked;
        self.touch();
    }

    // --- focus --------------------------------------------------------------

    /// Currently focused element.
    #[must_use]
    pub fn active_element(&self) -> Option<&ElementId> {
        self.active.as_ref()
    }

    /// Move focus to `id`, or clear it with `None`.
    pub fn set_active_element(&mut self, id: Option<&str>) {
        self.active = id.map(ElementId::new);
        self.touch();
    }

    /// Drop focus. Returns the element that had it.
    pub fn blur(&mut self) -> Option<ElementId> {
        let previous = self.active.take();
        if previous.is_some() {
            self.touch();
        }
        previous
    }

    // --- overlay ------------------------------------------------------------

    /// Current overlay content.
    #[must_use]
    pub fn overlay(&self) -> &OverlayContent {
        &self.overlay
    }

    /// Replace the overlay content.
    pub fn set_overlay(&mut self, content: OverlayContent) {
        self.overlay = content;
        self.touch();
    }

    // --- images -------------------------------------------------------------

    /// Deliver a load outcome to the image of `member`'s card inside `id`.
    /// Returns `true` if a watch fired.
    pub fn settle_card_image(
        &mut self,
        id: &str,
        member: MemberId,
        outcome: ImageOutcome,
        default_src: &str,
    ) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        let fired = el
            .children
            .iter_mut()
            .filter_map(|n| match n {
                Node::Card(card) if card.member_id == member => Some(card),
                _ => None,
            })
            .any(|card| card.image.settle(outcome, default_src));
        if fired {
            self.touch();
        }
        fired
    }

    /// Deliver a load outcome to the overlay image.
    pub fn settle_overlay_image(&mut self, outcome: ImageOutcome, default_src: &str) -> bool {
        let fired = self
            .overlay
            .image
            .as_mut()
            .is_some_and(|img| img.settle(outcome, default_src));
        if fired {
            self.touch();
        }
        fired
    }

    // --- listeners ----------------------------------------------------------

    /// Handlers attached to `(id, kind)`.
    #[must_use]
    pub fn handlers(&self, id: &ElementId, kind: EventKind) -> &[Handler] {
        self.listeners
            .get(&(id.clone(), kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `handler` is attached to `(id, kind)`.
    #[must_use]
    pub fn has_listener(&self, id: &str, kind: EventKind, handler: Handler) -> bool {
        self.handlers(&ElementId::new(id), kind).contains(&handler)
    }

    /// Total number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Attach a listener. Attaching the same handler twice keeps one copy.
    pub(crate) fn add_listener(&mut self, id: &ElementId, kind: EventKind, handler: Handler) -> bool {
        let slot = self.listeners.entry((id.clone(), kind)).or_default();
        if slot.contains(&handler) {
            return false;
        }
        slot.push(handler);
        self.touch();
        true
    }

    /// Detach a listener. Detaching one that is not attached does nothing.
    pub(crate) fn remove_listener(&mut self, id: &ElementId, kind: EventKind, handler: Handler) -> bool {
        let key = (id.clone(), kind);
        let Some(slot) = self.listeners.get_mut(&key) else {
            return false;
        };
        let before = slot.len();
        slot.retain(|h| *h != handler);
        let removed = slot.len() != before;
        if slot.is_empty() {
            self.listeners.remove(&key);
        }
        if removed {
            self.touch();
        }
        removed
    }
}
