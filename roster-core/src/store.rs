//! Member Store: the session's id → member map.
//!
//! Populated once from the data source and read-only afterwards. Iteration
//! follows insertion order; a duplicate id replaces the earlier record in
//! place rather than moving to the end.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::types::{Member, MemberId};

/// Insertion-ordered collection of members keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemberStore {
    members: Vec<Member>,
    index: HashMap<MemberId, usize>,
}

impl MemberStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of records.
    #[must_use]
    pub fn from_members(records: impl IntoIterator<Item = Member>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Replace the whole contents with `records`.
    ///
    /// Loading the same payload twice leaves the store unchanged.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = Member>) {
        self.members.clear();
        self.index.clear();

        let mut duplicates = 0usize;
        for member in records {
            if !member.has_consistent_tenure() {
                warn!(
                    id = %member.id,
                    appointed_on = ?member.appointed_on,
                    relieved_on = ?member.relieved_on,
                    "Member tenure is not a numeric range with appointedOn <= relievedOn"
                );
            }
            if let Some(&slot) = self.index.get(&member.id) {
                duplicates += 1;
                self.members[slot] = member;
            } else {
                self.index.insert(member.id, self.members.len());
                self.members.push(member);
            }
        }

        if duplicates > 0 {
            warn!(duplicates, "Duplicate member ids in payload; later records win");
        }
        debug!(count = self.members.len(), "Member store loaded");
    }

    /// Look up a member by id.
    #[must_use]
    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.index.get(&id).map(|&slot| &self.members[slot])
    }

    /// Whether a member with this id exists.
    #[must_use]
    pub fn contains(&self, id: MemberId) -> bool {
        self.index.contains_key(&id)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the store holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Department;

    fn member(id: u64, first: &str) -> Member {
        Member::new(id, first, "Patel", Department::YouthLeague, 2019, 2021)
    }

    #[test]
    fn keeps_insertion_order() {
        let store = MemberStore::from_members([member(3, "C"), member(1, "A"), member(2, "B")]);
        let ids: Vec<u64> = store.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn duplicate_id_replaces_in_place() {
        let store = MemberStore::from_members([member(1, "Old"), member(2, "B"), member(1, "New")]);
        assert_eq!(store.len(), 2);
        let names: Vec<&str> = store.iter().map(|m| m.f_name.as_str()).collect();
        assert_eq!(names, vec!["New", "B"]);
        assert_eq!(store.get(MemberId(1)).map(|m| m.f_name.as_str()), Some("New"));
    }

    #[test]
    fn reload_overwrites_previous_contents() {
        let mut store = MemberStore::from_members([member(1, "A"), member(2, "B")]);
        store.replace_all([member(9, "Z")]);
        assert_eq!(store.len(), 1);
        assert!(store.get(MemberId(1)).is_none());
        assert!(store.contains(MemberId(9)));

        store.replace_all([member(9, "Z")]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_store() {
        let store = MemberStore::new();
        assert!(store.is_empty());
        assert!(store.get(MemberId(1)).is_none());
    }
}
