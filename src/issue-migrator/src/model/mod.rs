//! Source issue records and the target documents synthesized from them.
//!
//! Source types deserialize directly from the source tracker's JSON dumps so
//! cached records can be fed to the composer without any reshaping.

mod document;
mod issue;
mod journal;
mod version;

pub use document::{Comment, ImportIssue, ImportRequest, IssueState, TargetDocument};
pub use issue::{
    Attachment, ChildIssue, CustomField, CustomFieldValue, IssueRelation, IssueStatusRef,
    NamedRef, ParentRef, SourceIssue,
};
pub use journal::{Change, JournalDetail, JournalEntry, PropertyKind};
pub use version::SourceVersion;
