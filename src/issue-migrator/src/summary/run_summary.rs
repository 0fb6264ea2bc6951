//! Run summary types.

use super::result::ProcessingResult;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of issue dumps found.
    pub issues_discovered: usize,

    /// Number of documents composed.
    pub issues_composed: usize,

    /// Number of requested issues without a dump.
    pub issues_skipped: usize,

    /// Number of issues that failed to load or compose.
    pub issues_failed: usize,

    /// Number of milestones synthesized.
    pub milestones_written: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ProcessingResult) {
        match result {
            ProcessingResult::Composed { .. } => self.issues_composed += 1,
            ProcessingResult::Skipped { .. } => self.issues_skipped += 1,
            ProcessingResult::Failed { .. } => self.issues_failed += 1,
        }
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.issues_failed > 0
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.issues_failed == 0
    }
}
