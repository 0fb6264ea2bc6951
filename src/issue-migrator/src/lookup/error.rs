//! Attribute resolution error types.

use super::LookupKind;
use thiserror::Error;

/// Errors that can occur while resolving coded attribute values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// An id was absent from its lookup table while strict mode was on.
    #[error("Unresolved {kind} reference: {id}")]
    UnresolvedReference { kind: LookupKind, id: u64 },
}
