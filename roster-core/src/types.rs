//! Core type definitions for the member directory.
//!
//! Records arrive as loosely-typed JSON (years may be numbers or strings,
//! optional fields may be null, extra name parts may appear), so the types
//! here accept that shape and expose typed accessors on top.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, RosterError};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Unique identifier for a member record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| RosterError::InvalidRecord(format!("member id '{s}': {e}")))
    }
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

/// The fixed set of organisational departments, one display section each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    /// `BOARD MEMBERS`
    BoardMembers,
    /// `SAMAJ TRUSTEE`
    SamajTrustee,
    /// `TRUST TRUSTEE`
    TrustTrustee,
    /// `BOARD OF GOVERNORS`
    BoardOfGovernors,
    /// `YOUTH LEAGUE`
    YouthLeague,
    /// `SUB COMMITTEE`
    SubCommittee,
    /// `GAAM REPRESENTATIVES`
    GaamRepresentatives,
}

impl Department {
    /// Every department, in page order.
    pub const ALL: [Department; 7] = [
        Self::BoardMembers,
        Self::SamajTrustee,
        Self::TrustTrustee,
        Self::BoardOfGovernors,
        Self::YouthLeague,
        Self::SubCommittee,
        Self::GaamRepresentatives,
    ];

    /// Canonical upper-case label as it appears in member records.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BoardMembers => "BOARD MEMBERS",
            Self::SamajTrustee => "SAMAJ TRUSTEE",
            Self::TrustTrustee => "TRUST TRUSTEE",
            Self::BoardOfGovernors => "BOARD OF GOVERNORS",
            Self::YouthLeague => "YOUTH LEAGUE",
            Self::SubCommittee => "SUB COMMITTEE",
            Self::GaamRepresentatives => "GAAM REPRESENTATIVES",
        }
    }

    /// Id of the list container that holds this department's cards.
    #[must_use]
    pub fn container_id(self) -> &'static str {
        match self {
            Self::BoardMembers => "board-members",
            Self::SamajTrustee => "trustees",
            Self::TrustTrustee => "trust-trustees",
            Self::BoardOfGovernors => "governors",
            Self::YouthLeague => "youth-league",
            Self::SubCommittee => "committee-convenors",
            Self::GaamRepresentatives => "gaam-representatives",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = RosterError;

    /// Case-insensitive match against the canonical labels. Surrounding
    /// whitespace is significant.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| RosterError::InvalidRecord(format!("unknown department '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Years
// ---------------------------------------------------------------------------

/// A year as stored in a record: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    /// Stored as a JSON number.
    Number(i64),
    /// Stored as a JSON string (may or may not be numeric).
    Text(String),
}

impl YearValue {
    /// Numeric coercion of the stored value. `None` for non-numeric text
    /// or values outside the `i32` range.
    #[must_use]
    pub fn as_year(&self) -> Option<i32> {
        match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse::<i32>().ok(),
        }
    }
}

impl From<i32> for YearValue {
    fn from(year: i32) -> Self {
        Self::Number(i64::from(year))
    }
}

impl fmt::Display for YearValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// One person's tenure in one department.
///
/// Unknown string fields are treated as extra name parts and merged into
/// [`Member::full_name`] between the first and last name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique key across the store.
    pub id: MemberId,
    /// First name.
    #[serde(rename = "fName", default)]
    pub f_name: String,
    /// Last name.
    #[serde(rename = "lName", default)]
    pub l_name: String,
    /// Department label as stored (matched case-insensitively).
    #[serde(default)]
    pub department: Option<String>,
    /// Position held.
    #[serde(default)]
    pub position: Option<String>,
    /// Alternate title field, used when `position` is absent.
    #[serde(default)]
    pub title: Option<String>,
    /// First year of service.
    #[serde(default)]
    pub appointed_on: Option<YearValue>,
    /// Last year of service; equals `appointed_on` for a single-year tenure.
    #[serde(default)]
    pub relieved_on: Option<YearValue>,
    /// Path to a profile picture.
    #[serde(default)]
    pub profile_pic: Option<String>,
    /// Any other fields of the record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Member {
    /// Build a member with the fields the directory actually relies on.
    #[must_use]
    pub fn new(
        id: u64,
        f_name: impl Into<String>,
        l_name: impl Into<String>,
        department: Department,
        appointed_on: i32,
        relieved_on: i32,
    ) -> Self {
        Self {
            id: MemberId(id),
            f_name: f_name.into(),
            l_name: l_name.into(),
            department: Some(department.label().to_string()),
            position: None,
            title: None,
            appointed_on: Some(appointed_on.into()),
            relieved_on: Some(relieved_on.into()),
            profile_pic: None,
            extra: Map::new(),
        }
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Set the profile picture path.
    #[must_use]
    pub fn with_profile_pic(mut self, path: impl Into<String>) -> Self {
        self.profile_pic = Some(path.into());
        self
    }

    /// The department this member belongs to, if it is one of the fixed set.
    #[must_use]
    pub fn department(&self) -> Option<Department> {
        self.department.as_deref().and_then(|d| d.parse().ok())
    }

    /// First name, extra name parts and last name, space separated.
    #[must_use]
    pub fn full_name(&self) -> String {
        let middle = self.extra.values().filter_map(Value::as_str);
        std::iter::once(self.f_name.as_str())
            .chain(middle)
            .chain(std::iter::once(self.l_name.as_str()))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `position`, else `title`, else an empty string.
    #[must_use]
    pub fn display_position(&self) -> &str {
        [self.position.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|p| !p.trim().is_empty())
            .unwrap_or("")
    }

    /// Numeric start year, if present and numeric.
    #[must_use]
    pub fn start_year(&self) -> Option<i32> {
        self.appointed_on.as_ref().and_then(YearValue::as_year)
    }

    /// Numeric end year, if present and numeric.
    #[must_use]
    pub fn end_year(&self) -> Option<i32> {
        self.relieved_on.as_ref().and_then(YearValue::as_year)
    }

    /// Whether `year` falls inside the inclusive tenure range.
    ///
    /// Members with a missing or non-numeric year never serve in any year.
    #[must_use]
    pub fn served_in(&self, year: i32) -> bool {
        match (self.start_year(), self.end_year()) {
            (Some(start), Some(end)) => start <= year && year <= end,
            _ => false,
        }
    }

    /// Whether the stored tenure honours `appointedOn <= relievedOn`.
    /// Non-numeric tenures are reported as inconsistent.
    #[must_use]
    pub fn has_consistent_tenure(&self) -> bool {
        matches!((self.start_year(), self.end_year()), (Some(s), Some(e)) if s <= e)
    }
}

/// Decode a JSON array of member records.
///
/// # Errors
/// Returns `RosterError::InvalidRecord` if the payload is not an array of
/// objects carrying at least a numeric `id`.
pub fn parse_members(json: &str) -> Result<Vec<Member>> {
    serde_json::from_str(json).map_err(|e| RosterError::InvalidRecord(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_parse_is_case_insensitive() {
        assert_eq!("youth league".parse::<Department>().ok(), Some(Department::YouthLeague));
        assert_eq!("Board Of Governors".parse::<Department>().ok(), Some(Department::BoardOfGovernors));
        assert!(" YOUTH LEAGUE".parse::<Department>().is_err());
        assert!("SEARCH".parse::<Department>().is_err());
    }

    #[test]
    fn year_value_coercion() {
        assert_eq!(YearValue::Number(2019).as_year(), Some(2019));
        assert_eq!(YearValue::Text(" 2020 ".into()).as_year(), Some(2020));
        assert_eq!(YearValue::Text("present".into()).as_year(), None);
        assert_eq!(YearValue::Number(i64::MAX).as_year(), None);
    }

    #[test]
    fn parses_loose_records() {
        let json = r#"[
            {"id": 1, "fName": "Anil", "mName": "Kumar", "lName": "Patel",
             "department": "youth league", "appointedOn": "2019", "relievedOn": 2021,
             "profilePic": null, "title": "Convenor"}
        ]"#;
        let members = parse_members(json).expect("parse");
        assert_eq!(members.len(), 1);
        let m = &members[0];
        assert_eq!(m.id, MemberId(1));
        assert_eq!(m.department(), Some(Department::YouthLeague));
        assert_eq!(m.full_name(), "Anil Kumar Patel");
        assert_eq!(m.display_position(), "Convenor");
        assert_eq!(m.start_year(), Some(2019));
        assert_eq!(m.end_year(), Some(2021));
        assert!(m.served_in(2020));
        assert!(!m.served_in(2022));
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(parse_members(r#"{"members": []}"#).is_err());
        assert!(parse_members("not json").is_err());
    }

    #[test]
    fn position_falls_through_blank_values() {
        let mut m = Member::new(7, "Ravi", "Shah", Department::BoardMembers, 2020, 2020);
        assert_eq!(m.display_position(), "");
        m.position = Some(String::new());
        m.title = Some("Treasurer".into());
        assert_eq!(m.display_position(), "Treasurer");
    }

    #[test]
    fn non_numeric_tenure_is_inconsistent() {
        let mut m = Member::new(3, "A", "B", Department::SubCommittee, 2018, 2016);
        assert!(!m.has_consistent_tenure());
        m.appointed_on = Some(YearValue::Text("n/a".into()));
        m.relieved_on = Some(2020.into());
        assert!(!m.has_consistent_tenure());
        assert!(!m.served_in(2020));
    }
}
