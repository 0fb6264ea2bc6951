//! Composition error types.

use crate::journal::JournalError;
use crate::labels::ClassifyError;
use crate::markup::MarkupError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while composing a target document.
///
/// Component errors pass through unchanged.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Change history could not be rebuilt.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// The description failed to convert.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// Labels could not be derived.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// The title or header template failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
