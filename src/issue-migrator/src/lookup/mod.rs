//! Attribute resolution.
//!
//! Journal details store enumerated attributes as raw ids. This module maps
//! them back to display names using lookup tables the caller built before the
//! run.

mod error;
mod tables;

pub use error::ResolveError;
pub use tables::{EnumerationValue, Enumerations, LookupTable, LookupTables, StatusValue};

use crate::model::{PropertyKind, SourceIssue};
use std::collections::BTreeSet;
use std::fmt;

/// Enumerated attribute kinds that journal details can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LookupKind {
    Status,
    Tracker,
    Priority,
    Category,
    User,
    Version,
    /// Parent issue references address issues, not enumerations, and are
    /// never resolved.
    Parent,
}

impl LookupKind {
    /// Returns the kind referenced by an attribute detail name, if any.
    #[must_use]
    pub fn for_attribute(name: &str) -> Option<Self> {
        match name {
            "status_id" => Some(Self::Status),
            "tracker_id" => Some(Self::Tracker),
            "priority_id" => Some(Self::Priority),
            "category_id" => Some(Self::Category),
            "assigned_to_id" | "author_id" => Some(Self::User),
            "fixed_version_id" => Some(Self::Version),
            "parent_id" => Some(Self::Parent),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Tracker => "tracker",
            Self::Priority => "priority",
            Self::Category => "category",
            Self::User => "user",
            Self::Version => "version",
            Self::Parent => "parent",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when an id is missing from its lookup table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// Fall back to the raw coded value.
    #[default]
    Lenient,
    /// Fail with [`ResolveError::UnresolvedReference`].
    Strict,
}

/// Resolves coded attribute values to display names.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    tables: &'a LookupTables,
    policy: ResolvePolicy,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `tables`.
    #[must_use]
    pub fn new(tables: &'a LookupTables, policy: ResolvePolicy) -> Self {
        Self { tables, policy }
    }

    /// Resolves `coded` for `kind`.
    ///
    /// Values that do not parse as integers are returned unchanged, as are
    /// parent references.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnresolvedReference`] only under
    /// [`ResolvePolicy::Strict`] when the id is absent from the table.
    pub fn resolve(&self, kind: LookupKind, coded: &str) -> Result<String, ResolveError> {
        let Some(table) = self.tables.table(kind) else {
            return Ok(coded.to_string());
        };
        let Ok(id) = coded.trim().parse::<u64>() else {
            return Ok(coded.to_string());
        };

        match table.get(&id) {
            Some(name) => Ok(name.clone()),
            None if self.policy == ResolvePolicy::Strict => {
                Err(ResolveError::UnresolvedReference { kind, id })
            }
            None => Ok(coded.to_string()),
        }
    }
}

/// Collects every id referenced by the issue's journal that is missing from
/// its lookup table.
///
/// Callers use this to warn about values that will be rendered raw.
#[must_use]
pub fn missing_references(issue: &SourceIssue, tables: &LookupTables) -> BTreeSet<(LookupKind, u64)> {
    let mut missing = BTreeSet::new();

    let details = issue
        .journals
        .iter()
        .flat_map(|journal| journal.details.iter())
        .filter(|detail| detail.property == PropertyKind::Attribute);

    for detail in details {
        let Some(kind) = LookupKind::for_attribute(&detail.name) else {
            continue;
        };
        let Some(table) = tables.table(kind) else {
            continue;
        };
        let ids = [detail.old_value.as_deref(), detail.new_value.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|value| value.trim().parse::<u64>().ok());
        for id in ids {
            if !table.contains_key(&id) {
                missing.insert((kind, id));
            }
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JournalDetail, JournalEntry, NamedRef};

    fn tables() -> LookupTables {
        let mut tables = LookupTables::default();
        tables.users.insert(7, "alice".to_string());
        tables.users.insert(12, "bob".to_string());
        tables.statuses.insert(1, "New".to_string());
        tables
    }

    #[test]
    fn resolves_known_ids() {
        let tables = tables();
        let resolver = Resolver::new(&tables, ResolvePolicy::Lenient);

        assert_eq!(resolver.resolve(LookupKind::User, "7").unwrap(), "alice");
        assert_eq!(resolver.resolve(LookupKind::Status, " 1 ").unwrap(), "New");
    }

    #[test]
    fn passes_names_through() {
        let tables = tables();
        let resolver = Resolver::new(&tables, ResolvePolicy::Strict);

        assert_eq!(resolver.resolve(LookupKind::User, "carol").unwrap(), "carol");
    }

    #[test]
    fn lenient_falls_back_to_raw_value() {
        let tables = tables();
        let resolver = Resolver::new(&tables, ResolvePolicy::Lenient);

        assert_eq!(resolver.resolve(LookupKind::User, "99").unwrap(), "99");
    }

    #[test]
    fn strict_rejects_unknown_ids() {
        let tables = tables();
        let resolver = Resolver::new(&tables, ResolvePolicy::Strict);

        assert_eq!(
            resolver.resolve(LookupKind::User, "99"),
            Err(ResolveError::UnresolvedReference {
                kind: LookupKind::User,
                id: 99
            })
        );
    }

    #[test]
    fn parent_references_stay_raw() {
        let mut tables = tables();
        tables.statuses.insert(5, "Closed".to_string());
        let resolver = Resolver::new(&tables, ResolvePolicy::Strict);

        assert_eq!(resolver.resolve(LookupKind::Parent, "5").unwrap(), "5");
    }

    #[test]
    fn maps_attribute_names_to_kinds() {
        assert_eq!(LookupKind::for_attribute("assigned_to_id"), Some(LookupKind::User));
        assert_eq!(
            LookupKind::for_attribute("fixed_version_id"),
            Some(LookupKind::Version)
        );
        assert_eq!(LookupKind::for_attribute("subject"), None);
    }

    #[test]
    fn reports_missing_references_once() {
        let created_on: chrono::DateTime<chrono::Utc> = "2016-03-01T10:00:00Z".parse().unwrap();
        let mut issue: SourceIssue = serde_json::from_str(
            r#"{
                "id": 1, "subject": "s",
                "status": {"id": 1, "name": "New"},
                "priority": {"id": 2, "name": "Normal"},
                "tracker": {"id": 1, "name": "Bug"},
                "author": {"id": 7, "name": "alice"},
                "created_on": "2016-03-01T10:00:00Z",
                "updated_on": "2016-03-01T10:00:00Z"
            }"#,
        )
        .unwrap();
        let entry = |details| JournalEntry {
            id: 1,
            user: NamedRef::new(7, "alice"),
            notes: None,
            created_on,
            details,
        };
        issue.journals.push(entry(vec![
            JournalDetail::new(PropertyKind::Attribute, "assigned_to_id", Some("7"), Some("40")),
            JournalDetail::new(PropertyKind::Attribute, "parent_id", None, Some("300")),
        ]));
        issue.journals.push(entry(vec![JournalDetail::new(
            PropertyKind::Attribute,
            "assigned_to_id",
            Some("40"),
            None,
        )]));

        let missing = missing_references(&issue, &tables());

        assert_eq!(missing.len(), 1);
        assert!(missing.contains(&(LookupKind::User, 40)));
    }
}
