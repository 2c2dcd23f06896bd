//! Board page session.
//!
//! [`BoardPage`] owns everything one page view needs: the member store, the
//! document, the listener registry, the overlay and the debouncer. State sits
//! behind a single `Arc<Mutex<_>>` so timer callbacks can reach it; the lock is
//! never held across an await or while scheduling a timer.
//!
//! ## Lifecycle
//!
//! 1. Check that the document carries every element a listener targets.
//! 2. Attach the page-wide controls.
//! 3. Load the store. A failed load renders the error message into every
//!    department and leaves the page in [`PageStatus::Failed`].
//! 4. Render the selected year and start listening to the search bar.

use std::sync::Arc;

use chrono::Datelike;
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use roster_core::config::RosterConfig;
use roster_core::debounce::Debouncer;
use roster_core::filter::filter_by_year;
use roster_core::store::MemberStore;
use roster_core::types::MemberId;
use roster_source::{MemberSource, SourceClient};

use crate::dom::{ids, Document, ElementId, Handler};
use crate::error::{PageError, Result};
use crate::events::{ClickTarget, Key, PageEvent};
use crate::listeners::{slots, ListenerRegistry, Section};
use crate::overlay::{OverlayController, OverlayPhase};
use crate::render::Renderer;

/// Debounce key for the overlay close fallback.
pub const OVERLAY_CLOSE_KEY: &str = "overlay-close";

/// Outcome of page initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// Members loaded and rendered.
    Ready,
    /// Members could not be loaded; the error message is shown.
    Failed,
}

/// Mutable state of one page view.
#[derive(Debug)]
pub struct PageState {
    pub(crate) store: MemberStore,
    pub(crate) document: Document,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) overlay: OverlayController,
    pub(crate) status: PageStatus,
    pub(crate) load_error: Option<String>,
}

impl PageState {
    /// Loaded members.
    #[must_use]
    pub fn store(&self) -> &MemberStore {
        &self.store
    }

    /// The page document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Listener states.
    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Overlay phase.
    #[must_use]
    pub fn overlay_phase(&self) -> OverlayPhase {
        self.overlay.phase()
    }

    /// Initialisation outcome.
    #[must_use]
    pub fn status(&self) -> PageStatus {
        self.status
    }

    /// Why the member load failed, if it did.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub(crate) fn renderer<'a>(&'a mut self, config: &'a RosterConfig) -> Renderer<'a> {
        Renderer::new(&mut self.document, &mut self.listeners, config)
    }

    /// Render the departments for `year`; `None` renders them all empty.
    pub(crate) fn render_year(&mut self, config: &RosterConfig, year: Option<i32>) {
        let results = year.map(|y| filter_by_year(&self.store, y)).unwrap_or_default();
        debug!(?year, count = results.len(), "Year filter applied");
        Renderer::new(&mut self.document, &mut self.listeners, config).render_members_list(&results);
    }
}

/// Parse a year control value.
pub(crate) fn parse_year(raw: &str) -> Option<i32> {
    let year = raw.trim().parse().ok();
    if year.is_none() {
        debug!(value = raw, "Non-numeric year ignored");
    }
    year
}

/// One live board directory page.
#[derive(Clone)]
pub struct BoardPage {
    pub(crate) state: Arc<Mutex<PageState>>,
    pub(crate) debouncer: Debouncer,
    pub(crate) config: Arc<RosterConfig>,
}

impl BoardPage {
    /// Wire up `document`, load members from `source` and render the
    /// selected year.
    ///
    /// # Errors
    /// `PageError::Config` for an invalid configuration and
    /// `PageError::MissingElement` if the document lacks a required element.
    /// A failed member load is not an error; see [`PageStatus::Failed`].
    pub async fn initialize(
        config: RosterConfig,
        mut document: Document,
        client: &SourceClient,
        source: &MemberSource,
    ) -> Result<Self> {
        config.validate()?;

        let mut listeners = ListenerRegistry::board_page();
        if let Some(missing) = listeners.targets().filter(|t| !document.contains(t.as_str())).min() {
            return Err(PageError::MissingElement(missing.to_string()));
        }

        listeners.set_listener(&mut document, Section::Controls, slots::YEAR_CHANGE, true);
        listeners.set_listener(&mut document, Section::Controls, slots::KEYBOARD, true);

        let mut store = MemberStore::new();
        let (status, load_error) = match client.load_into(source, &mut store).await {
            Ok(count) => {
                info!(%source, count, "Board page loaded");
                (PageStatus::Ready, None)
            }
            Err(e) => {
                warn!(%source, error = %e, "Board page could not load members");
                (PageStatus::Failed, Some(e.to_string()))
            }
        };

        let mut state = PageState {
            store,
            document,
            listeners,
            overlay: OverlayController::new(),
            status,
            load_error,
        };

        match status {
            PageStatus::Failed => state.renderer(&config).render_error(),
            PageStatus::Ready => {
                let selected = state.document.value(ids::YEAR_SELECT).trim().to_string();
                let year = if selected.is_empty() {
                    Some(chrono::Local::now().year())
                } else {
                    parse_year(&selected)
                };
                state.render_year(&config, year);
                for slot in [slots::SEARCH_INPUT, slots::SEARCH_FOCUS_IN, slots::SEARCH_FOCUS_OUT] {
                    state.listeners.set_listener(&mut state.document, Section::Search, slot, true);
                }
            }
        }

        let debouncer = Debouncer::with_default_delay(config.timing.default_debounce());
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            debouncer,
            config: Arc::new(config),
        })
    }

    /// [`BoardPage::initialize`] against the source named in `config`.
    ///
    /// # Errors
    /// See [`BoardPage::initialize`].
    pub async fn initialize_from_config(config: RosterConfig, document: Document) -> Result<Self> {
        let (client, source) = SourceClient::from_config(&config.source);
        Self::initialize(config, document, &client, &source).await
    }

    /// Initialisation outcome.
    #[must_use]
    pub fn status(&self) -> PageStatus {
        self.state.lock().status
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// The debouncer driving this page's timers.
    #[must_use]
    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Inspect the page state.
    pub fn with_state<R>(&self, f: impl FnOnce(&PageState) -> R) -> R {
        f(&self.state.lock())
    }

    /// A copy of the current document.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.state.lock().document.clone()
    }

    // --- events -------------------------------------------------------------

    /// Deliver `event` to its target and bubble it up through the ancestors,
    /// invoking only attached listeners.
    pub fn dispatch(&self, event: PageEvent) {
        let Some(kind) = event.kind() else {
            self.settle_image(&event);
            return;
        };

        let route = {
            let mut guard = self.state.lock();
            let st = &mut *guard;
            match &event {
                PageEvent::Input { target, value } | PageEvent::Change { target, value } => {
                    st.document.set_value(target.as_str(), value);
                }
                PageEvent::FocusIn { target } => st.document.set_active_element(Some(target.as_str())),
                PageEvent::FocusOut { related, .. } => {
                    st.document.set_active_element(related.as_ref().map(ElementId::as_str));
                }
                _ => {}
            }

            let mut route = Vec::new();
            for el in st.document.ancestry(event.target().as_str()) {
                for &handler in st.document.handlers(&el, kind) {
                    route.push((el.clone(), handler));
                }
            }
            route
        };

        if route.is_empty() {
            trace!(?event, "No listener for event");
        }
        for (current, handler) in route {
            self.invoke(handler, &current, &event);
        }
    }

    fn invoke(&self, handler: Handler, current: &ElementId, event: &PageEvent) {
        match (handler, event) {
            (Handler::OpenOverlay, PageEvent::Click { hit: ClickTarget::CardImage(id), .. }) => {
                self.open_overlay(*id);
            }
            (Handler::SelectResultYear, PageEvent::Click { hit, .. }) => {
                if let Some(id) = hit.member() {
                    self.select_result_year(id);
                }
            }
            (Handler::SearchInput, PageEvent::Input { value, .. }) => self.on_search_input(value),
            (Handler::SearchFocusIn, _) => self.on_search_focus_in(current),
            (Handler::SearchFocusOut, _) => self.on_search_focus_out(current),
            (Handler::YearSelected, PageEvent::Change { value, .. }) => self.on_year_selected(value),
            (Handler::KeyDown, PageEvent::KeyDown { key }) => self.on_key(key),
            (Handler::CloseOverlay, _) => {
                self.close_overlay();
            }
            (Handler::OverlayTransitionEnd, _) => {
                self.finish_overlay_close();
            }
            (handler, event) => trace!(?handler, ?event, "Event ignored by handler"),
        }
    }

    fn settle_image(&self, event: &PageEvent) {
        let PageEvent::Image { container, member, outcome } = event else {
            return;
        };
        let default_pic = self.config.assets.default_profile_pic.as_str();
        let mut st = self.state.lock();
        let fired = if container.as_str() == ids::OVERLAY {
            st.document.overlay().member_id == Some(*member)
                && st.document.settle_overlay_image(*outcome, default_pic)
        } else {
            st.document.settle_card_image(container.as_str(), *member, *outcome, default_pic)
        };
        trace!(%container, %member, ?outcome, fired, "Image settled");
    }

    fn on_key(&self, key: &Key) {
        if *key != Key::Escape {
            return;
        }
        self.blur_active();
        let open = self.state.lock().overlay.is_open();
        if open {
            self.close_overlay();
        }
    }

    /// Drop focus and deliver the focus-out that the element losing it sees.
    pub(crate) fn blur_active(&self) {
        let previous = self.state.lock().document.blur();
        if let Some(target) = previous {
            self.dispatch(PageEvent::FocusOut { target, related: None });
        }
    }

    // --- overlay ------------------------------------------------------------

    /// Show the detail overlay for `id`. Unknown ids change nothing.
    pub fn open_overlay(&self, id: MemberId) -> bool {
        let mut guard = self.state.lock();
        let st = &mut *guard;
        st.overlay.open(
            &st.store,
            &mut st.document,
            &mut st.listeners,
            &self.config.assets.default_profile_pic,
            id,
        )
    }

    /// Begin closing the overlay and arm the fallback that completes the
    /// close if no transition-end arrives.
    pub fn close_overlay(&self) -> bool {
        let began = {
            let mut guard = self.state.lock();
            let st = &mut *guard;
            st.overlay.close(&mut st.document, &mut st.listeners)
        };
        if began {
            let state = Arc::clone(&self.state);
            self.debouncer
                .debounce(OVERLAY_CLOSE_KEY, self.config.timing.overlay_close_fallback(), move || {
                    let mut guard = state.lock();
                    let st = &mut *guard;
                    st.overlay.finish_close(&mut st.document, &mut st.listeners);
                });
        }
        began
    }

    fn finish_overlay_close(&self) {
        let mut guard = self.state.lock();
        let st = &mut *guard;
        st.overlay.finish_close(&mut st.document, &mut st.listeners);
    }
}

impl std::fmt::Debug for BoardPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardPage")
            .field("status", &self.status())
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}
