//! Runner configuration.

use std::path::{Path, PathBuf};

/// Configuration for one migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to `migrator.toml`.
    config_path: PathBuf,
    /// Path to the enumeration dump.
    lookups_path: PathBuf,
    /// Directory of `<id>.json` issue dumps.
    issues_path: PathBuf,
    /// Directory the composed documents are written to.
    output_path: PathBuf,
    /// Issue ids to migrate; empty means all.
    issue_ids: Vec<u64>,
    /// Whether to print previews instead of writing files.
    dry_run: bool,
    /// Maximum issues composed at once.
    concurrency: usize,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(
        config_path: PathBuf,
        lookups_path: PathBuf,
        issues_path: PathBuf,
        output_path: PathBuf,
        dry_run: bool,
        concurrency: usize,
    ) -> Self {
        Self {
            config_path,
            lookups_path,
            issues_path,
            output_path,
            issue_ids: Vec::new(),
            dry_run,
            concurrency: concurrency.max(1),
        }
    }

    /// Restricts the run to the given issue ids.
    #[must_use]
    pub fn with_issue_ids(mut self, issue_ids: Vec<u64>) -> Self {
        self.issue_ids = issue_ids;
        self
    }

    /// Returns the configuration file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the enumeration dump path.
    pub fn lookups_path(&self) -> &Path {
        &self.lookups_path
    }

    /// Returns the issue dump directory.
    pub fn issues_path(&self) -> &Path {
        &self.issues_path
    }

    /// Returns the output directory.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the selected issue ids; empty means all.
    pub fn issue_ids(&self) -> &[u64] {
        &self.issue_ids
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the max issues composed at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
