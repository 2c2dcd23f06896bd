//! Filter Engine: year-range and name matching over a store snapshot.
//!
//! Both filters are pure: they borrow the store, allocate a result vector and
//! never reorder. Results follow store iteration order.

use tracing::debug;

use crate::store::MemberStore;
use crate::types::Member;

/// Minimum trimmed query length before a name search runs.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// All members whose inclusive `[appointedOn, relievedOn]` range contains `year`.
///
/// Members with missing or non-numeric years are excluded.
#[must_use]
pub fn filter_by_year(store: &MemberStore, year: i32) -> Vec<&Member> {
    let mut skipped = 0usize;
    let results: Vec<&Member> = store
        .iter()
        .filter(|m| {
            if m.start_year().is_none() || m.end_year().is_none() {
                skipped += 1;
                return false;
            }
            m.served_in(year)
        })
        .collect();

    debug!(year, matched = results.len(), skipped, "Filtered members by year");
    results
}

/// A normalised name query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Empty, whitespace-only or shorter than the minimum length.
    /// No search is performed for this state.
    TooShort,
    /// One term: matches first or last name.
    Single(String),
    /// Two or more terms: first term against first name, second against last.
    /// Terms past the second are dropped.
    Pair(String, String),
}

impl SearchQuery {
    /// Lowercase, trim and split `raw` on whitespace.
    #[must_use]
    pub fn parse(raw: &str, min_len: usize) -> Self {
        let normalized = raw.trim().to_lowercase();
        if normalized.chars().count() < min_len.max(1) {
            return Self::TooShort;
        }

        let mut terms = normalized.split_whitespace();
        match (terms.next(), terms.next()) {
            (Some(first), Some(second)) => Self::Pair(first.to_string(), second.to_string()),
            (Some(only), None) => Self::Single(only.to_string()),
            _ => Self::TooShort,
        }
    }

    /// Whether this query would run the matcher.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        !matches!(self, Self::TooShort)
    }

    /// Whether `member` satisfies this query.
    ///
    /// Reversed order (last name first) is not matched for two-term queries.
    #[must_use]
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            Self::TooShort => false,
            Self::Single(term) => {
                member.f_name.to_lowercase().contains(term.as_str())
                    || member.l_name.to_lowercase().contains(term.as_str())
            }
            Self::Pair(first, last) => {
                member.f_name.to_lowercase().contains(first.as_str())
                    && member.l_name.to_lowercase().contains(last.as_str())
            }
        }
    }
}

/// Members matching a name query. A `TooShort` query returns no results
/// without touching the store.
#[must_use]
pub fn filter_by_name<'a>(store: &'a MemberStore, query: &SearchQuery) -> Vec<&'a Member> {
    if !query.is_searchable() {
        return Vec::new();
    }

    let results: Vec<&Member> = store.iter().filter(|m| query.matches(m)).collect();
    debug!(?query, matched = results.len(), "Filtered members by name");
    results
}
