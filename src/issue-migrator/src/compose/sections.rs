//! Body sections that need no conversion.

use crate::journal::format_timestamp;
use crate::markup::issue_url;
use crate::model::SourceIssue;
use crate::names::{inverse_relation_type, relation_label};

/// Separator placed between body sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Indents every non-empty line so the text renders preformatted.
pub(super) fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn issue_link(tracker_url: &str, id: u64) -> String {
    let id = id.to_string();
    format!("[#{id}]({})", issue_url(tracker_url, &id))
}

/// One `Name: value` line per custom field with a value.
pub(super) fn custom_fields(issue: &SourceIssue) -> Option<String> {
    let lines: Vec<String> = issue
        .custom_fields
        .iter()
        .filter_map(|field| {
            field
                .display_value()
                .map(|value| format!("{}: {value}", field.name))
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Parent, subtask and relation links, seen from `issue`.
pub(super) fn relations(issue: &SourceIssue, tracker_url: &str) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(parent) = issue.parent {
        parts.push(format!(
            "**Parent Task:** {}",
            issue_link(tracker_url, parent.id)
        ));
    }

    if !issue.children.is_empty() {
        let lines: Vec<String> = issue
            .children
            .iter()
            .map(|child| {
                format!(
                    "* {} {}: {}",
                    issue_link(tracker_url, child.id),
                    child.tracker.name,
                    child.subject
                )
            })
            .collect();
        parts.push(format!("**Subtasks:**\n{}", lines.join("\n")));
    }

    if !issue.relations.is_empty() {
        let lines: Vec<String> = issue
            .relations
            .iter()
            .map(|relation| {
                let relation_type = if relation.is_outgoing(issue.id) {
                    relation.relation_type.as_str()
                } else {
                    inverse_relation_type(&relation.relation_type)
                };
                format!(
                    "* {} {}",
                    relation_label(relation_type),
                    issue_link(tracker_url, relation.target_issue_id(issue.id))
                )
            })
            .collect();
        parts.push(format!("**Related Issues:**\n{}", lines.join("\n")));
    }

    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

/// One bullet per attachment.
pub(super) fn attachments(issue: &SourceIssue) -> Option<String> {
    if issue.attachments.is_empty() {
        return None;
    }

    let lines: Vec<String> = issue
        .attachments
        .iter()
        .map(|attachment| {
            let mut line = format!(
                "* [{}]({}) {} - {}",
                attachment.filename,
                attachment.content_url,
                attachment.author.name,
                format_timestamp(&attachment.created_on)
            );
            if let Some(description) = attachment
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
            {
                line.push_str(" - ");
                line.push_str(description);
            }
            line
        })
        .collect();

    Some(format!("**Attachments:**\n{}", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Attachment, ChildIssue, CustomField, CustomFieldValue, IssueRelation, NamedRef, ParentRef,
    };
    use chrono::TimeZone;

    const TRACKER: &str = "https://tracker.example.org";

    fn issue() -> SourceIssue {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "subject": "Crash on startup",
            "status": {"id": 4, "name": "Feedback"},
            "priority": {"id": 2, "name": "Normal"},
            "tracker": {"id": 1, "name": "Bug"},
            "author": {"id": 7, "name": "alice"},
            "created_on": "2016-03-01T10:00:00Z",
            "updated_on": "2016-03-02T11:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn indents_non_empty_lines() {
        assert_eq!(indent("a\n\nb"), "    a\n\n    b");
    }

    #[test]
    fn skips_empty_custom_fields() {
        let mut issue = issue();
        assert_eq!(custom_fields(&issue), None);

        issue.custom_fields = vec![
            CustomField {
                id: 3,
                name: "Severity".to_string(),
                value: Some(CustomFieldValue::Single("High".to_string())),
            },
            CustomField {
                id: 4,
                name: "Platform".to_string(),
                value: Some(CustomFieldValue::Single("  ".to_string())),
            },
            CustomField {
                id: 5,
                name: "Affects".to_string(),
                value: None,
            },
        ];

        assert_eq!(custom_fields(&issue).as_deref(), Some("Severity: High"));
    }

    #[test]
    fn renders_relations_from_own_side() {
        let mut issue = issue();
        assert_eq!(relations(&issue, TRACKER), None);

        issue.parent = Some(ParentRef { id: 10 });
        issue.children.push(ChildIssue {
            id: 43,
            tracker: NamedRef::new(2, "Feature"),
            subject: "Split config".to_string(),
        });
        issue.relations = vec![
            IssueRelation {
                relation_type: "relates".to_string(),
                issue_id: 42,
                issue_to_id: 50,
            },
            IssueRelation {
                relation_type: "blocks".to_string(),
                issue_id: 60,
                issue_to_id: 42,
            },
        ];

        assert_eq!(
            relations(&issue, TRACKER).unwrap(),
            "**Parent Task:** [#10](https://tracker.example.org/issues/10)\n\n\
             **Subtasks:**\n\
             * [#43](https://tracker.example.org/issues/43) Feature: Split config\n\n\
             **Related Issues:**\n\
             * Related to [#50](https://tracker.example.org/issues/50)\n\
             * Blocked by [#60](https://tracker.example.org/issues/60)"
        );
    }

    #[test]
    fn renders_attachments() {
        let mut issue = issue();
        assert_eq!(attachments(&issue), None);

        let attachment = |filename: &str, description: Option<&str>| Attachment {
            id: 1,
            filename: filename.to_string(),
            filesize: 120,
            content_url: format!("https://tracker.example.org/attachments/download/1/{filename}"),
            author: NamedRef::new(7, "alice"),
            created_on: chrono::Utc.with_ymd_and_hms(2016, 3, 1, 10, 5, 0).unwrap(),
            description: description.map(str::to_string),
        };
        issue.attachments = vec![
            attachment("crash.log", Some("full log")),
            attachment("core.txt", Some("")),
        ];

        assert_eq!(
            attachments(&issue).unwrap(),
            "**Attachments:**\n\
             * [crash.log](https://tracker.example.org/attachments/download/1/crash.log) alice - 2016-03-01 10:05:00 UTC - full log\n\
             * [core.txt](https://tracker.example.org/attachments/download/1/core.txt) alice - 2016-03-01 10:05:00 UTC"
        );
    }
}
