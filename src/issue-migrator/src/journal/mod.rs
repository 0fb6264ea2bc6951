//! Change history reconstruction.
//!
//! Each journal entry becomes one change-log entry: a header naming the
//! author and date, one bullet per changed property, then the converted
//! notes.

mod detail;
mod error;

pub use detail::{render_detail, UNKNOWN_CUSTOM_FIELD};
pub use error::JournalError;

use crate::lookup::Resolver;
use crate::markup::MarkupConverter;
use crate::model::{Comment, JournalEntry, SourceIssue};
use chrono::{DateTime, Utc};

/// Everything journal rendering needs besides the entries themselves.
#[derive(Debug, Clone, Copy)]
pub struct JournalContext<'a> {
    /// Issue the journal belongs to; custom-field names come from here.
    pub issue: &'a SourceIssue,

    /// Resolver for coded attribute values.
    pub resolver: Resolver<'a>,

    /// Converter for notes.
    pub converter: &'a MarkupConverter,
}

/// Formats a timestamp the way every rendered document shows it.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Renders every entry, in order. Entries are never dropped, even when they
/// carry neither details nor notes.
///
/// # Errors
///
/// Returns the first [`JournalError`] hit by any entry.
pub fn render(
    entries: &[JournalEntry],
    context: &JournalContext<'_>,
) -> Result<Vec<Comment>, JournalError> {
    entries
        .iter()
        .map(|entry| render_entry(entry, context))
        .collect()
}

/// Renders a single entry.
///
/// # Errors
///
/// Returns [`JournalError`] if a detail is malformed or unresolvable, or if
/// the notes fail to convert.
pub fn render_entry(
    entry: &JournalEntry,
    context: &JournalContext<'_>,
) -> Result<Comment, JournalError> {
    let mut sections = vec![format!(
        "Updated by {} on {}",
        entry.user.name,
        format_timestamp(&entry.created_on)
    )];

    if !entry.details.is_empty() {
        let lines = entry
            .details
            .iter()
            .map(|detail| render_detail(detail, entry.id, context).map(|line| format!("* {line}")))
            .collect::<Result<Vec<_>, _>>()?;
        sections.push(lines.join("\n"));
    }

    if let Some(notes) = entry.visible_notes() {
        let notes = context.converter.convert(Some(notes))?;
        if !notes.is_empty() {
            sections.push(notes);
        }
    }

    Ok(Comment {
        created_at: entry.created_on,
        body: sections.join("\n\n"),
    })
}
