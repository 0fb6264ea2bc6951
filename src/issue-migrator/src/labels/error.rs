//! Classification error types.

/// Label classification error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// The tracker has no label mapping and the rules reject unmapped trackers.
    #[error("Tracker '{tracker}' of issue #{issue_id} has no label mapping")]
    UnmappedTracker { issue_id: u64, tracker: String },
}
