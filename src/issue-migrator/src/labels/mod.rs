//! Label and state classification.
//!
//! Labels are derived in a fixed order: `imported`, the status label, the
//! priority, the tracker label and the category. Later duplicates are
//! skipped.

mod error;

pub use error::ClassifyError;

use crate::lookup::LookupTables;
use crate::model::{IssueState, SourceIssue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label every migrated issue carries, always first.
pub const IMPORTED_LABEL: &str = "imported";

/// What to do with a tracker that has no entry in the tracker table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackerPolicy {
    /// Use the tracker name itself as the label.
    #[default]
    PassThrough,
    /// Fail with [`ClassifyError::UnmappedTracker`].
    Reject,
}

/// Rule table for label derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LabelRules {
    /// Status name to label. Statuses not listed contribute no label.
    pub statuses: BTreeMap<String, String>,

    /// Priority that contributes no label.
    pub default_priority: Option<String>,

    /// Tracker name to label.
    pub trackers: BTreeMap<String, String>,

    /// Handling of trackers missing from `trackers`.
    pub unmapped_tracker: TrackerPolicy,
}

impl Default for LabelRules {
    fn default() -> Self {
        let pairs = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(key, label)| ((*key).to_string(), (*label).to_string()))
                .collect()
        };

        Self {
            statuses: pairs(&[("Feedback", "feedback")]),
            default_priority: Some("Normal".to_string()),
            trackers: pairs(&[("Bug", "bug"), ("Defect", "bug"), ("Feature", "enhancement")]),
            unmapped_tracker: TrackerPolicy::PassThrough,
        }
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Ordered, duplicate-free labels starting with [`IMPORTED_LABEL`].
    pub labels: Vec<String>,

    /// Open or closed.
    pub state: IssueState,
}

/// Finds `key` in a name-keyed table, ignoring ASCII case.
fn lookup<'a>(table: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, label)| label.as_str())
}

fn push_unique(labels: &mut Vec<String>, label: &str) {
    let label = label.trim();
    if !label.is_empty() && !labels.iter().any(|existing| existing == label) {
        labels.push(label.to_string());
    }
}

/// Derives the label set and state of an issue.
///
/// The closed-status set of `tables` decides the state. When that set is
/// empty, the issue's own status flag is used, and the close timestamp only
/// when the dump carries no flag.
///
/// # Errors
///
/// Returns [`ClassifyError::UnmappedTracker`] only when `rules` is set to
/// [`TrackerPolicy::Reject`].
pub fn classify(
    issue: &SourceIssue,
    tables: &LookupTables,
    rules: &LabelRules,
) -> Result<Classification, ClassifyError> {
    let mut labels = vec![IMPORTED_LABEL.to_string()];

    if let Some(label) = lookup(&rules.statuses, &issue.status.name) {
        push_unique(&mut labels, label);
    }

    let is_default_priority = rules
        .default_priority
        .as_deref()
        .is_some_and(|default| default.eq_ignore_ascii_case(&issue.priority.name));
    if !is_default_priority {
        push_unique(&mut labels, &issue.priority.name);
    }

    match lookup(&rules.trackers, &issue.tracker.name) {
        Some(label) => push_unique(&mut labels, label),
        None if rules.unmapped_tracker == TrackerPolicy::Reject => {
            return Err(ClassifyError::UnmappedTracker {
                issue_id: issue.id,
                tracker: issue.tracker.name.clone(),
            });
        }
        None => push_unique(&mut labels, &issue.tracker.name),
    }

    if let Some(category) = &issue.category {
        push_unique(&mut labels, &category.name);
    }

    let closed = if tables.closed_statuses.is_empty() {
        issue
            .status
            .closed
            .unwrap_or(issue.closed_on.is_some())
    } else {
        tables.is_closed_status(issue.status.id)
    };

    Ok(Classification {
        labels,
        state: if closed {
            IssueState::Closed
        } else {
            IssueState::Open
        },
    })
}
