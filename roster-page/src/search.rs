//! Search bar and year controls.
//!
//! Name search is debounced: each keystroke replaces the pending search, and
//! the search that finally runs reads the input as it is at that moment. A
//! query that became too short while the timer ran shows the prompt instead
//! of stale results.

use std::sync::Arc;

use tracing::debug;

use roster_core::config::RosterConfig;
use roster_core::filter::{filter_by_name, SearchQuery};
use roster_core::types::MemberId;

use crate::dom::{classes, ids, ElementId};
use crate::listeners::Section;
use crate::render::Renderer;
use crate::session::{parse_year, BoardPage, PageState};

/// Debounce key for name search.
pub const INPUT_KEY: &str = "input";
/// Debounce key for search bar focus loss.
pub const FOCUS_KEY: &str = "focus";

impl PageState {
    /// Show the "try searching" prompt in the results list.
    fn show_search_prompt(&mut self, config: &RosterConfig) {
        let mut renderer = self.renderer(config);
        renderer.assert_is_empty(0, Section::Search, &config.messages.try_searching);
        renderer.set_loading(Section::Search, false);
    }

    /// Run the name matcher against the live input value.
    fn run_search(&mut self, config: &RosterConfig) {
        let query = SearchQuery::parse(self.document.value(ids::SEARCH_INPUT), config.search.min_query_len);
        if !query.is_searchable() {
            debug!("Search input cleared before timer fired");
            self.show_search_prompt(config);
            return;
        }
        let results = filter_by_name(&self.store, &query);
        debug!(?query, count = results.len(), "Name search ran");
        Renderer::new(&mut self.document, &mut self.listeners, config).render_search_members_list(&results);
    }
}

impl BoardPage {
    pub(crate) fn on_search_input(&self, raw: &str) {
        let query = SearchQuery::parse(raw, self.config.search.min_query_len);
        {
            let mut st = self.state.lock();
            if !query.is_searchable() {
                st.show_search_prompt(&self.config);
                return;
            }
            st.renderer(&self.config).set_loading(Section::Search, true);
        }

        let state = Arc::clone(&self.state);
        let config = Arc::clone(&self.config);
        self.debouncer.debounce(INPUT_KEY, self.config.timing.search_input(), move || {
            state.lock().run_search(&config);
        });
    }

    pub(crate) fn on_search_focus_in(&self, current: &ElementId) {
        let mut st = self.state.lock();
        if let Some(parent) = st.document.parent(current.as_str()).cloned() {
            st.document.add_class(parent.as_str(), classes::ACTIVE);
        }
    }

    pub(crate) fn on_search_focus_out(&self, current: &ElementId) {
        let state = Arc::clone(&self.state);
        let container = current.clone();
        self.debouncer.debounce(FOCUS_KEY, self.config.timing.focus_out(), move || {
            let mut st = state.lock();
            let still_inside = st
                .document
                .active_element()
                .is_some_and(|active| st.document.is_within(active.as_str(), container.as_str()));
            if still_inside {
                return;
            }
            if let Some(parent) = st.document.parent(container.as_str()).cloned() {
                st.document.remove_class(parent.as_str(), classes::ACTIVE);
            }
        });
    }

    /// Re-run the year filter with the start year of a clicked search result.
    pub(crate) fn select_result_year(&self, id: MemberId) {
        {
            let mut st = self.state.lock();
            let year = st
                .document
                .cards(ids::SEARCH_RESULTS)
                .find(|card| card.member_id == id)
                .and_then(|card| card.year.as_deref())
                .map(str::trim)
                .filter(|y| !y.is_empty() && *y != "0")
                .map(str::to_string);
            let Some(year) = year else {
                debug!(%id, "Search result has no start year");
                return;
            };

            st.render_year(&self.config, parse_year(&year));
            st.document.set_value(ids::YEAR_SELECT, &year);
        }
        self.blur_active();
    }

    pub(crate) fn on_year_selected(&self, value: &str) {
        self.state.lock().render_year(&self.config, parse_year(value));
    }
}

#[cfg(test)]
mod tests {
    use roster_core::types::{Department, Member};
    use roster_core::MemberStore;

    use super::*;
    use crate::dom::Document;
    use crate::listeners::{slots, ListenerRegistry};
    use crate::overlay::OverlayController;
    use crate::session::PageStatus;

    fn state() -> PageState {
        PageState {
            store: MemberStore::from_members([
                Member::new(1, "Anil", "Patel", Department::YouthLeague, 2019, 2021),
                Member::new(2, "Anita", "Desai", Department::BoardMembers, 2015, 2016),
            ]),
            document: Document::board_page(),
            listeners: ListenerRegistry::board_page(),
            overlay: OverlayController::new(),
            status: PageStatus::Ready,
            load_error: None,
        }
    }

    #[test]
    fn live_value_drives_search() {
        let config = RosterConfig::default();
        let mut st = state();
        st.document.set_value(ids::SEARCH_INPUT, "ani");
        st.run_search(&config);
        assert_eq!(st.document.cards(ids::SEARCH_RESULTS).count(), 2);
        assert!(st.listeners.is_active(Section::Search, slots::CLICK));
    }

    #[test]
    fn cleared_input_shows_prompt() {
        let config = RosterConfig::default();
        let mut st = state();
        st.document.set_value(ids::SEARCH_INPUT, "an");
        st.run_search(&config);
        assert_eq!(
            st.document.message(ids::SEARCH_RESULTS).map(|m| m.text.as_str()),
            Some("Try searching!")
        );
        assert!(!st.listeners.is_active(Section::Search, slots::CLICK));
        assert!(!st.document.has_class(ids::SEARCH_RESULTS, classes::LOADING));
    }

    #[test]
    fn no_match_shows_no_results() {
        let config = RosterConfig::default();
        let mut st = state();
        st.document.set_value(ids::SEARCH_INPUT, "zzz");
        st.run_search(&config);
        assert_eq!(
            st.document.message(ids::SEARCH_RESULTS).map(|m| m.text.as_str()),
            Some("No results!")
        );
    }
}
