//! Static filter assignments for the demo thumbnail groups.
//!
//! Each [`GroupId`] names one row of thumbnails on the page. The
//! [`FilterAssignmentTable`] relates a group's thumbnails positionally
//! to an ordered list of filter names: thumbnail `j` gets filter `j`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::FilterName;

/// Identifier for a demo thumbnail group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupId {
    /// Daisy photo row.
    Daisy,
    /// City skyline row.
    City,
    /// Mount Fuji row.
    Fuji,
}

impl GroupId {
    /// All groups in page order.
    pub const ALL: [Self; 3] = [Self::Daisy, Self::City, Self::Fuji];

    /// Class name that marks a thumbnail as a member of this group.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Daisy => "daisy",
            Self::City => "city",
            Self::Fuji => "fuji",
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Error returned when parsing an unknown group name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown thumbnail group {0:?} (expected daisy, city, or fuji)")]
pub struct UnknownGroup(String);

impl FromStr for GroupId {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.class_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownGroup(s.to_owned()))
    }
}

const DAISY: &[FilterName] = &[
    FilterName::from_static("twenties"),
    FilterName::from_static("ocean"),
    FilterName::from_static("perfume"),
    FilterName::from_static("warmth"),
    FilterName::from_static("solange"),
    FilterName::from_static("extreme_offset_red"),
];

const CITY: &[FilterName] = &[
    FilterName::from_static("ocean"),
    FilterName::from_static("offset"),
    FilterName::from_static("twenties"),
    FilterName::from_static("warmth"),
    FilterName::from_static("solange"),
    FilterName::from_static("extreme_offset_red"),
];

const FUJI: &[FilterName] = &[
    FilterName::from_static("ocean"),
    FilterName::from_static("perfume"),
    FilterName::from_static("wood"),
    FilterName::from_static("crimson"),
    FilterName::from_static("offset"),
    FilterName::from_static("warmth"),
    FilterName::from_static("extreme_offset_red"),
];

/// Static lookup from group to its ordered filter list.
#[derive(Debug, Clone, Copy)]
pub struct FilterAssignmentTable {
    entries: &'static [(GroupId, &'static [FilterName])],
}

impl FilterAssignmentTable {
    /// The assignments shown on the documentation page.
    pub const BUILTIN: Self = Self {
        entries: &[
            (GroupId::Daisy, DAISY),
            (GroupId::City, CITY),
            (GroupId::Fuji, FUJI),
        ],
    };

    /// Build a table from literal entries.
    #[must_use]
    pub const fn new(entries: &'static [(GroupId, &'static [FilterName])]) -> Self {
        Self { entries }
    }

    /// Ordered filters for `group`. Groups absent from the table have an
    /// empty assignment.
    #[must_use]
    pub fn get(&self, group: GroupId) -> &'static [FilterName] {
        self.entries
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, filters)| *filters)
            .unwrap_or_default()
    }

    /// Groups in definition order.
    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.entries.iter().map(|(g, _)| *g)
    }
}

impl Default for FilterAssignmentTable {
    fn default() -> Self {
        Self::BUILTIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(filters: &[FilterName]) -> Vec<&str> {
        filters.iter().map(FilterName::as_str).collect()
    }

    #[test]
    fn builtin_daisy_order() {
        assert_eq!(
            names(FilterAssignmentTable::BUILTIN.get(GroupId::Daisy)),
            [
                "twenties",
                "ocean",
                "perfume",
                "warmth",
                "solange",
                "extreme_offset_red"
            ]
        );
    }

    #[test]
    fn builtin_fuji_has_seven_filters() {
        let fuji = FilterAssignmentTable::BUILTIN.get(GroupId::Fuji);
        assert_eq!(fuji.len(), 7);
        assert_eq!(fuji[2].as_str(), "wood");
        assert_eq!(fuji[6].as_str(), "extreme_offset_red");
    }

    #[test]
    fn groups_follow_definition_order() {
        let groups: Vec<_> = FilterAssignmentTable::BUILTIN.groups().collect();
        assert_eq!(groups, GroupId::ALL);
    }

    #[test]
    fn missing_group_has_empty_assignment() {
        const ONLY_CITY: FilterAssignmentTable =
            FilterAssignmentTable::new(&[(GroupId::City, CITY)]);
        assert!(ONLY_CITY.get(GroupId::Daisy).is_empty());
        assert_eq!(ONLY_CITY.get(GroupId::City).len(), 6);
    }

    #[test]
    fn group_parses_case_insensitively() {
        assert_eq!("Fuji".parse::<GroupId>(), Ok(GroupId::Fuji));
        assert_eq!(" city ".parse::<GroupId>(), Ok(GroupId::City));
        assert!("tulip".parse::<GroupId>().is_err());
    }
}
