//! Milestones synthesized from source versions.

use crate::model::{IssueState, SourceVersion};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A target milestone, in the shape milestone endpoints accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub title: String,
    pub description: String,
    pub due_on: Option<DateTime<Utc>>,
    pub state: IssueState,
}

impl Milestone {
    /// Builds the milestone for `version`.
    ///
    /// The due date becomes midnight UTC. Only versions with status
    /// `closed` produce closed milestones; locked versions stay open.
    #[must_use]
    pub fn from_version(version: &SourceVersion, source_name: &str) -> Self {
        let mut description = format!("Imported from {source_name}");
        if let Some(text) = version
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
        {
            description.push_str("\n\n");
            description.push_str(text);
        }

        Self {
            title: version.name.clone(),
            description,
            due_on: version
                .due_date
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc()),
            state: if version.status == "closed" {
                IssueState::Closed
            } else {
                IssueState::Open
            },
        }
    }

    /// Renders a human-readable preview.
    #[must_use]
    pub fn render(&self) -> String {
        let rule = "-".repeat(80);
        let due_on = self
            .due_on
            .map(|due| due.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .unwrap_or_default();
        [
            self.title.clone(),
            rule.clone(),
            self.description.clone(),
            rule,
            format!("State: {}", self.state.as_str()),
            format!("Due on: {due_on}"),
        ]
        .join("\n")
    }
}
