//! Change journal entries.

use super::NamedRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of property a journal detail records a change for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// A core issue attribute (`status_id`, `subject`, ...).
    #[serde(rename = "attr")]
    Attribute,

    /// A custom field; the detail name holds the field id.
    #[serde(rename = "cf")]
    CustomField,

    /// A relation; the detail name holds the relation type.
    #[serde(rename = "relation")]
    Relation,

    /// An attachment; the detail name holds the attachment id.
    #[serde(rename = "attachment")]
    Attachment,
}

/// A single field-level change within a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDetail {
    /// What kind of property changed.
    pub property: PropertyKind,

    /// Property name or id, interpreted according to `property`.
    pub name: String,

    /// Raw value before the change.
    #[serde(default)]
    pub old_value: Option<String>,

    /// Raw value after the change.
    #[serde(default)]
    pub new_value: Option<String>,
}

/// Which side(s) of a detail carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<'a> {
    /// Both old and new values are present.
    Updated { old: &'a str, new: &'a str },

    /// Only the old value is present.
    Removed { old: &'a str },

    /// Only the new value is present.
    Added { new: &'a str },
}

impl JournalDetail {
    /// Creates a detail.
    pub fn new(
        property: PropertyKind,
        name: impl Into<String>,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> Self {
        Self {
            property,
            name: name.into(),
            old_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
        }
    }

    /// Classifies the detail by which values are present.
    ///
    /// Returns `None` when neither value is present, which only happens for
    /// malformed records.
    #[must_use]
    pub fn change(&self) -> Option<Change<'_>> {
        match (self.old_value.as_deref(), self.new_value.as_deref()) {
            (Some(old), Some(new)) => Some(Change::Updated { old, new }),
            (Some(old), None) => Some(Change::Removed { old }),
            (None, Some(new)) => Some(Change::Added { new }),
            (None, None) => None,
        }
    }
}

/// One update event on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Journal id.
    pub id: u64,

    /// Author of the update.
    pub user: NamedRef,

    /// Free-text notes in source markup.
    #[serde(default)]
    pub notes: Option<String>,

    /// When the update happened.
    pub created_on: DateTime<Utc>,

    /// Field-level changes, in source order.
    #[serde(default)]
    pub details: Vec<JournalDetail>,
}

impl JournalEntry {
    /// Returns the notes if they contain anything besides whitespace.
    #[must_use]
    pub fn visible_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|notes| !notes.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_reflects_present_values() {
        let updated = JournalDetail::new(PropertyKind::Attribute, "status_id", Some("1"), Some("2"));
        assert_eq!(
            updated.change(),
            Some(Change::Updated { old: "1", new: "2" })
        );

        let removed = JournalDetail::new(PropertyKind::Attachment, "9", Some("a.txt"), None);
        assert_eq!(removed.change(), Some(Change::Removed { old: "a.txt" }));

        let added = JournalDetail::new(PropertyKind::CustomField, "3", None, Some("High"));
        assert_eq!(added.change(), Some(Change::Added { new: "High" }));

        let malformed = JournalDetail::new(PropertyKind::Relation, "relates", None, None);
        assert_eq!(malformed.change(), None);
    }

    #[test]
    fn property_kinds_use_tracker_names() {
        let detail: JournalDetail = serde_json::from_str(
            r#"{"property": "cf", "name": "3", "old_value": null, "new_value": "High"}"#,
        )
        .unwrap();
        assert_eq!(detail.property, PropertyKind::CustomField);
        assert!(detail.old_value.is_none());
    }
}
