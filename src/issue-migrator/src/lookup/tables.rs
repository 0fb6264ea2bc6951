//! Read-only lookup tables built from the source tracker's enumerations.

use super::LookupKind;
use crate::model::SourceVersion;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An enumeration value as dumped from the source tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationValue {
    pub id: u64,
    pub name: String,
}

/// A status enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusValue {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_closed: bool,
}

/// Raw enumeration dump, as fetched by the source tracker client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enumerations {
    pub statuses: Vec<StatusValue>,
    pub trackers: Vec<EnumerationValue>,
    pub priorities: Vec<EnumerationValue>,
    pub categories: Vec<EnumerationValue>,
    pub users: Vec<EnumerationValue>,
    pub versions: Vec<SourceVersion>,
}

/// Id to display-name mapping for one attribute kind.
pub type LookupTable = BTreeMap<u64, String>;

/// The full set of lookup tables for one migration run.
///
/// Built once before any core call and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTables {
    pub statuses: LookupTable,
    pub trackers: LookupTable,
    pub priorities: LookupTable,
    pub categories: LookupTable,
    pub users: LookupTable,
    pub versions: LookupTable,

    /// Ids of statuses that mean "closed".
    pub closed_statuses: BTreeSet<u64>,
}

impl LookupTables {
    /// Builds the tables from an enumeration dump.
    #[must_use]
    pub fn from_enumerations(enumerations: &Enumerations) -> Self {
        fn table(values: &[EnumerationValue]) -> LookupTable {
            values.iter().map(|v| (v.id, v.name.clone())).collect()
        }

        Self {
            statuses: enumerations
                .statuses
                .iter()
                .map(|s| (s.id, s.name.clone()))
                .collect(),
            trackers: table(&enumerations.trackers),
            priorities: table(&enumerations.priorities),
            categories: table(&enumerations.categories),
            users: table(&enumerations.users),
            versions: enumerations
                .versions
                .iter()
                .map(|v| (v.id, v.name.clone()))
                .collect(),
            closed_statuses: enumerations
                .statuses
                .iter()
                .filter(|s| s.is_closed)
                .map(|s| s.id)
                .collect(),
        }
    }

    /// Returns the table backing `kind`, if the kind is table-resolved.
    #[must_use]
    pub fn table(&self, kind: LookupKind) -> Option<&LookupTable> {
        match kind {
            LookupKind::Status => Some(&self.statuses),
            LookupKind::Tracker => Some(&self.trackers),
            LookupKind::Priority => Some(&self.priorities),
            LookupKind::Category => Some(&self.categories),
            LookupKind::User => Some(&self.users),
            LookupKind::Version => Some(&self.versions),
            LookupKind::Parent => None,
        }
    }

    /// Returns true if `status_id` is one of the closed statuses.
    #[must_use]
    pub fn is_closed_status(&self, status_id: u64) -> bool {
        self.closed_statuses.contains(&status_id)
    }
}
