//! Target issue documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of the separator line used by [`TargetDocument::render`].
const PREVIEW_RULE_WIDTH: usize = 80;

/// Open/closed state of a target issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Returns the state as a lowercase string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// A standalone comment of a target issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// When the originating journal entry was written.
    pub created_at: DateTime<Utc>,

    /// Rendered comment body in target markup.
    pub body: String,
}

/// The synthesized target-system issue.
///
/// Field names are stable across runs so the serialized form can be
/// compared between migrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDocument {
    /// Id of the source issue.
    pub source_id: u64,

    /// Issue title.
    pub title: String,

    /// Labels; "imported" always comes first.
    pub labels: Vec<String>,

    /// Open or closed.
    pub state: IssueState,

    /// Target-system login of the assignee.
    pub assignee: Option<String>,

    /// Milestone name, unresolved.
    pub milestone: Option<String>,

    /// Rendered body in target markup.
    pub body: String,

    /// Journal entries as separate comments (empty when inlined into the body).
    pub comments: Vec<Comment>,

    /// Source creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Source last-update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Source close timestamp, only set when the document is closed.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Issue part of an import request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportIssue {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

/// Payload for an import-style endpoint that accepts an issue together with
/// its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRequest {
    pub issue: ImportIssue,
    pub comments: Vec<Comment>,
}

impl TargetDocument {
    /// Renders a human-readable preview of the document and its comments.
    #[must_use]
    pub fn render(&self) -> String {
        let rule = "-".repeat(PREVIEW_RULE_WIDTH);
        let mut parts = vec![
            self.title.clone(),
            format!("Labels: {}", self.labels.join(", ")),
            rule.clone(),
            self.body.clone(),
        ];
        for comment in &self.comments {
            parts.push(rule.clone());
            parts.push(comment.body.clone());
        }
        let mut rendered = parts.join("\n");
        rendered.push('\n');
        rendered
    }

    /// Builds the import payload.
    ///
    /// Mapping the milestone name to a target milestone number is up to the
    /// caller, who passes the result as `milestone_number`.
    #[must_use]
    pub fn import_request(&self, milestone_number: Option<u64>) -> ImportRequest {
        ImportRequest {
            issue: ImportIssue {
                title: self.title.clone(),
                body: self.body.clone(),
                created_at: self.created_at,
                updated_at: self.updated_at,
                closed: self.state == IssueState::Closed,
                closed_at: self.closed_at,
                assignee: self.assignee.clone(),
                labels: self.labels.clone(),
                milestone: milestone_number,
            },
            comments: self.comments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_document() -> TargetDocument {
        let created = Utc.with_ymd_and_hms(2016, 3, 1, 10, 0, 0).unwrap();
        TargetDocument {
            source_id: 42,
            title: "[Redmine #42] Crash on startup".to_string(),
            labels: vec!["imported".to_string(), "bug".to_string()],
            state: IssueState::Closed,
            assignee: None,
            milestone: Some("2.4.0".to_string()),
            body: "Body text".to_string(),
            comments: vec![Comment {
                created_at: created,
                body: "Updated by alice".to_string(),
            }],
            created_at: created,
            updated_at: created,
            closed_at: Some(created),
        }
    }

    #[test]
    fn render_lists_title_labels_body_and_comments() {
        let rendered = sample_document().render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "[Redmine #42] Crash on startup");
        assert_eq!(lines[1], "Labels: imported, bug");
        assert_eq!(lines[2], "-".repeat(80));
        assert_eq!(lines[3], "Body text");
        assert_eq!(lines[5], "Updated by alice");
    }

    #[test]
    fn import_request_omits_unset_fields() {
        let request = sample_document().import_request(None);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["issue"]["closed"], true);
        assert_eq!(json["issue"]["created_at"], "2016-03-01T10:00:00Z");
        assert!(json["issue"].get("assignee").is_none());
        assert!(json["issue"].get("milestone").is_none());
        assert_eq!(json["comments"].as_array().unwrap().len(), 1);

        let with_milestone = sample_document().import_request(Some(3));
        assert_eq!(with_milestone.issue.milestone, Some(3));
    }

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&IssueState::Open).unwrap(), "\"open\"");
        assert_eq!(IssueState::Closed.as_str(), "closed");
    }
}
