#![allow(dead_code)]

pub use issue_migrator::markup::testing::ParagraphBackend;
use issue_migrator::{Enumerations, LookupTables, SourceIssue};
use serde_json::Value;
use std::path::PathBuf;

pub const TRACKER_URL: &str = "https://dev.example.org";

pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn load_enumerations() -> Enumerations {
    let content = std::fs::read_to_string(fixtures_root().join("lookups.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

pub fn load_tables() -> LookupTables {
    LookupTables::from_enumerations(&load_enumerations())
}

/// Loads `issues/<id>.json`, unwrapping the `issue` envelope if present.
pub fn load_issue(id: u64) -> SourceIssue {
    let path = fixtures_root().join(format!("issues/{id}.json"));
    let mut value: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    if let Some(issue) = value.get_mut("issue") {
        value = issue.take();
    }
    serde_json::from_value(value).unwrap()
}
