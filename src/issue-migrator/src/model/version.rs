//! Source tracker versions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A version (release) of the source project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVersion {
    /// Version id.
    pub id: u64,

    /// Version name; becomes the milestone title.
    pub name: String,

    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Planned release date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// `open`, `locked` or `closed`.
    #[serde(default = "default_version_status")]
    pub status: String,
}

fn default_version_status() -> String {
    "open".to_string()
}
