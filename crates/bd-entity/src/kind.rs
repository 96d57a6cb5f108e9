// kind.rs — EntityKind and the Entity trait.
//
// Every record in the system belongs to exactly one of four lists. The
// mutation layer keys its in-flight guards by EntityKind, and the store
// holds one cache per kind, so the enum shows up in almost every
// signature downstream.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four entity kinds managed by the back office.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Company,
    Area,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => write!(f, "user"),
            EntityKind::Company => write!(f, "company"),
            EntityKind::Area => write!(f, "area"),
            EntityKind::Task => write!(f, "task"),
        }
    }
}

/// Uniform surface over the four record types.
///
/// The store's generic cache and the coordinator's generic mutation path
/// only need three things from a record: which list it belongs to, its
/// server-assigned identifier, and whether it matches a search query.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Which of the four lists this record type belongs to.
    const KIND: EntityKind;

    /// The server-assigned identifier. Empty on a payload that has not
    /// been persisted yet.
    fn id(&self) -> &str;

    /// Assign the server-side identifier. Only the persistence side
    /// calls this, and only while the id is still empty.
    fn set_id(&mut self, id: String);

    /// Case-insensitive substring match over the record's displayable
    /// text fields (list search).
    fn matches(&self, query: &str) -> bool;
}

/// Case-insensitive substring check, shared by the `matches` impls.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_names() {
        assert_eq!(EntityKind::User.to_string(), "user");
        assert_eq!(EntityKind::Company.to_string(), "company");
        assert_eq!(EntityKind::Area.to_string(), "area");
        assert_eq!(EntityKind::Task.to_string(), "task");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::Company).unwrap();
        assert_eq!(json, "\"company\"");
    }

    #[test]
    fn substring_match_ignores_case() {
        assert!(contains_ignore_case("Quarterly Audit", "audit"));
        assert!(!contains_ignore_case("Quarterly Audit", "review"));
    }
}
