//! Loading of enumeration and issue dumps.

use super::RunnerError;
use crate::lookup::Enumerations;
use crate::model::SourceIssue;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// An issue dump, either bare or wrapped the way the source API returns it.
#[derive(Deserialize)]
#[serde(untagged)]
enum IssueDump {
    Wrapped { issue: SourceIssue },
    Bare(SourceIssue),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RunnerError> {
    let content = std::fs::read_to_string(path).map_err(|e| RunnerError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| RunnerError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Loads the enumeration dump.
pub(crate) fn load_enumerations(path: &Path) -> Result<Enumerations, RunnerError> {
    read_json(path)
}

/// Loads one issue dump.
pub(crate) fn load_issue(path: &Path) -> Result<SourceIssue, RunnerError> {
    Ok(match read_json::<IssueDump>(path)? {
        IssueDump::Wrapped { issue } | IssueDump::Bare(issue) => issue,
    })
}

/// Issue dumps found in a directory.
#[derive(Debug, Default)]
pub(crate) struct IssueFiles {
    /// `(id, path)` pairs sorted by id.
    pub(crate) found: Vec<(u64, PathBuf)>,
    /// Requested ids without a dump.
    pub(crate) missing: Vec<u64>,
}

/// Lists `<id>.json` files in `dir`, keeping only `selected` ids unless it
/// is empty. Files whose stem is not a number are ignored.
pub(crate) fn discover_issue_files(dir: &Path, selected: &[u64]) -> Result<IssueFiles, RunnerError> {
    if !dir.is_dir() {
        return Err(RunnerError::MissingDirectory {
            path: dir.display().to_string(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| RunnerError::IoError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RunnerError::IoError {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(id) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u64>().ok())
        else {
            continue;
        };
        if selected.is_empty() || selected.contains(&id) {
            found.push((id, path));
        }
    }
    found.sort_by_key(|(id, _)| *id);

    let mut missing: Vec<u64> = selected
        .iter()
        .copied()
        .filter(|id| found.binary_search_by_key(id, |(found_id, _)| *found_id).is_err())
        .collect();
    missing.sort_unstable();
    missing.dedup();

    Ok(IssueFiles { found, missing })
}
