//! Member → card display shape.
//!
//! Kept separate from any rendering surface so the formatting rules can be
//! tested on their own.

use serde::Serialize;

use crate::types::{Department, Member, MemberId, YearValue};

/// Everything a card or the detail overlay shows for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberCard {
    /// Member id, carried on the card for click lookups.
    pub id: MemberId,
    /// Resolved department, if the stored label is one of the fixed set.
    pub department: Option<Department>,
    /// First name, extra name parts and last name.
    pub full_name: String,
    /// Position, else title, else empty.
    pub position: String,
    /// `"2019"` for a single-year tenure, `"2019 - 2021"` otherwise.
    pub year_range: String,
    /// Profile picture, or the default asset when absent or blank.
    pub img_src: String,
    /// Start year as stored, used by search-result cards to rerun the year filter.
    pub appointed_on: Option<String>,
}

impl MemberCard {
    /// Format a raw member.
    #[must_use]
    pub fn from_member(member: &Member, default_pic: &str) -> Self {
        let img_src = member
            .profile_pic
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(default_pic)
            .to_string();

        Self {
            id: member.id,
            department: member.department(),
            full_name: member.full_name(),
            position: member.display_position().to_string(),
            year_range: year_range_label(member.appointed_on.as_ref(), member.relieved_on.as_ref()),
            img_src,
            appointed_on: member.appointed_on.as_ref().map(ToString::to_string),
        }
    }
}

/// Label for a tenure: one year when both ends agree, `"start - end"` otherwise.
///
/// Ends are compared numerically when both are numeric, textually otherwise.
/// A missing end collapses to the other one.
#[must_use]
pub fn year_range_label(start: Option<&YearValue>, end: Option<&YearValue>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => {
            let same = match (s.as_year(), e.as_year()) {
                (Some(a), Some(b)) => a == b,
                _ => s.to_string() == e.to_string(),
            };
            if same {
                s.to_string()
            } else {
                format!("{s} - {e}")
            }
        }
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}
