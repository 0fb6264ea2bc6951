//! Journal reconstruction error types.

use crate::lookup::ResolveError;
use crate::markup::MarkupError;
use crate::model::PropertyKind;
use thiserror::Error;

/// Errors that can occur while rebuilding the change history.
#[derive(Debug, Error)]
pub enum JournalError {
    /// A detail carries neither an old nor a new value.
    #[error("Malformed detail '{name}' ({property:?}) in journal {journal_id}: no old or new value")]
    MalformedDetail {
        journal_id: u64,
        property: PropertyKind,
        name: String,
    },

    /// A coded value could not be resolved in strict mode.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Journal notes failed to convert.
    #[error(transparent)]
    Markup(#[from] MarkupError),
}
