//! Source issue record.

use super::JournalEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named entity of the source tracker (user, tracker, priority, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Source tracker id.
    pub id: u64,

    /// Display name.
    pub name: String,
}

impl NamedRef {
    /// Creates a reference from an id and a name.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Issue status as embedded in an issue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatusRef {
    /// Status id.
    pub id: u64,

    /// Status name.
    pub name: String,

    /// Whether the source tracker flags this status as closed. Older dumps
    /// leave it out.
    #[serde(default, rename = "is_closed", skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
}

/// Value of a custom field. Multi-value fields arrive as lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl CustomFieldValue {
    /// Returns the value as display text, joining list values with ", ".
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Single(value) => value.trim().to_string(),
            Self::Multiple(values) => values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Returns true if the value carries no visible text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display().is_empty()
    }
}

/// A custom field set on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Custom field id.
    pub id: u64,

    /// Custom field name.
    pub name: String,

    /// Current value, if any.
    #[serde(default)]
    pub value: Option<CustomFieldValue>,
}

impl CustomField {
    /// Returns the display value, or `None` when the field is unset or blank.
    #[must_use]
    pub fn display_value(&self) -> Option<String> {
        self.value
            .as_ref()
            .map(CustomFieldValue::display)
            .filter(|v| !v.is_empty())
    }
}

/// A file attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment id.
    pub id: u64,

    /// File name.
    pub filename: String,

    /// Size in bytes.
    #[serde(default)]
    pub filesize: u64,

    /// Download URL on the source tracker.
    pub content_url: String,

    /// Uploader.
    pub author: NamedRef,

    /// Upload timestamp.
    pub created_on: DateTime<Utc>,

    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A relation between two issues.
///
/// The source tracker stores both endpoints; which one is "this" issue
/// depends on where the record was fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRelation {
    /// Relation type, e.g. `relates`, `blocks`, `precedes`.
    pub relation_type: String,

    /// Issue the relation originates from.
    pub issue_id: u64,

    /// Issue the relation points at.
    pub issue_to_id: u64,
}

impl IssueRelation {
    /// Returns the id of the issue on the other end of the relation.
    #[must_use]
    pub fn target_issue_id(&self, own_id: u64) -> u64 {
        if self.issue_id == own_id {
            self.issue_to_id
        } else {
            self.issue_id
        }
    }

    /// Returns true if `own_id` is the origin of this relation.
    #[must_use]
    pub fn is_outgoing(&self, own_id: u64) -> bool {
        self.issue_id == own_id
    }
}

/// Reference to a parent issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: u64,
}

/// A direct subtask of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildIssue {
    /// Subtask id.
    pub id: u64,

    /// Tracker of the subtask.
    pub tracker: NamedRef,

    /// Subtask subject.
    pub subject: String,
}

/// An issue record fetched from the source tracker.
///
/// Constructed once from a fetched or cached record and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIssue {
    /// Issue id.
    pub id: u64,

    /// One-line subject.
    pub subject: String,

    /// Description in source markup.
    #[serde(default)]
    pub description: Option<String>,

    /// Current status.
    pub status: IssueStatusRef,

    /// Current priority.
    pub priority: NamedRef,

    /// Tracker (issue type).
    pub tracker: NamedRef,

    /// Category, if set.
    #[serde(default)]
    pub category: Option<NamedRef>,

    /// Reporter.
    pub author: NamedRef,

    /// Assignee, if set.
    #[serde(default)]
    pub assigned_to: Option<NamedRef>,

    /// Target version, if set.
    #[serde(default)]
    pub fixed_version: Option<NamedRef>,

    /// Creation timestamp.
    pub created_on: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_on: DateTime<Utc>,

    /// Close timestamp, if the issue was ever closed.
    #[serde(default)]
    pub closed_on: Option<DateTime<Utc>>,

    /// Custom fields in source order.
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,

    /// Attached files.
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Relations to other issues.
    #[serde(default)]
    pub relations: Vec<IssueRelation>,

    /// Parent issue, if any.
    #[serde(default)]
    pub parent: Option<ParentRef>,

    /// Direct subtasks.
    #[serde(default)]
    pub children: Vec<ChildIssue>,

    /// Change journal, oldest first.
    #[serde(default)]
    pub journals: Vec<JournalEntry>,
}

impl SourceIssue {
    /// Looks up one of the issue's own custom fields by id.
    #[must_use]
    pub fn custom_field(&self, id: u64) -> Option<&CustomField> {
        self.custom_fields.iter().find(|field| field.id == id)
    }

    /// Returns true if a journal note already announces the migration to
    /// `target_name`.
    #[must_use]
    pub fn has_redirect_notice(&self, target_name: &str) -> bool {
        let marker = format!("migrated to {target_name}");
        self.journals
            .iter()
            .filter_map(|journal| journal.notes.as_deref())
            .any(|notes| notes.contains(&marker))
    }
}
