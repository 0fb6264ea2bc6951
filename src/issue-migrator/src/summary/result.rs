//! Processing result types.

/// Result of processing a single issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    /// The document was composed.
    Composed {
        /// Source issue id.
        issue_id: u64,
        /// Title of the composed document.
        title: String,
    },

    /// Processing was skipped.
    Skipped {
        /// Source issue id.
        issue_id: u64,
        /// Reason for skipping.
        reason: String,
    },

    /// Processing failed.
    Failed {
        /// Source issue id.
        issue_id: u64,
        /// Error message.
        error: String,
    },
}

impl ProcessingResult {
    /// Returns the source issue id.
    #[must_use]
    pub fn issue_id(&self) -> u64 {
        match self {
            Self::Composed { issue_id, .. }
            | Self::Skipped { issue_id, .. }
            | Self::Failed { issue_id, .. } => *issue_id,
        }
    }
}
