//! Rendering of single journal details.

use super::{JournalContext, JournalError};
use crate::lookup::LookupKind;
use crate::markup::issue_url;
use crate::model::{Change, JournalDetail, PropertyKind};
use crate::names::{attribute_label, relation_label};

/// Label used when a custom-field detail names a field the issue lacks.
pub const UNKNOWN_CUSTOM_FIELD: &str = "(unknown custom field)";

/// Renders one detail of journal `journal_id` as a single line of target
/// markup, without a bullet.
///
/// # Errors
///
/// Returns [`JournalError::MalformedDetail`] if the detail has neither an
/// old nor a new value, and [`JournalError::Resolve`] if a value cannot be
/// resolved in strict mode.
pub fn render_detail(
    detail: &JournalDetail,
    journal_id: u64,
    context: &JournalContext<'_>,
) -> Result<String, JournalError> {
    let change = detail
        .change()
        .ok_or_else(|| JournalError::MalformedDetail {
            journal_id,
            property: detail.property,
            name: detail.name.clone(),
        })?;

    if detail.property == PropertyKind::Attachment {
        return Ok(match change {
            Change::Updated { new, .. } => format!("File updated _{new}_"),
            Change::Removed { old } => format!("File deleted _{old}_"),
            Change::Added { new } => format!("File added _{new}_"),
        });
    }

    if detail.name == "description" {
        return Ok("**Description** updated".to_string());
    }

    let label = display_name(detail, context);
    let value = |raw: &str| display_value(detail, raw, context);

    Ok(match change {
        Change::Updated { old, new } => {
            format!("**{label}** changed from _{}_ to _{}_", value(old)?, value(new)?)
        }
        Change::Removed { old } => format!("**{label}** deleted ~~{}~~", value(old)?),
        Change::Added { new } => format!("**{label}** set to _{}_", value(new)?),
    })
}

/// Returns the label of the property a detail changed.
fn display_name(detail: &JournalDetail, context: &JournalContext<'_>) -> String {
    match detail.property {
        PropertyKind::CustomField => detail
            .name
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|id| context.issue.custom_field(id))
            .map_or_else(|| UNKNOWN_CUSTOM_FIELD.to_string(), |field| field.name.clone()),
        PropertyKind::Relation => relation_label(&detail.name),
        PropertyKind::Attribute | PropertyKind::Attachment => attribute_label(&detail.name),
    }
}

/// Resolves a raw detail value for display.
fn display_value(
    detail: &JournalDetail,
    raw: &str,
    context: &JournalContext<'_>,
) -> Result<String, JournalError> {
    match detail.property {
        PropertyKind::Attribute => match LookupKind::for_attribute(&detail.name) {
            Some(kind) => Ok(context.resolver.resolve(kind, raw)?),
            None => Ok(raw.to_string()),
        },
        PropertyKind::Relation => Ok(format!(
            "[#{raw}]({})",
            issue_url(context.converter.tracker_url(), raw)
        )),
        PropertyKind::CustomField | PropertyKind::Attachment => Ok(raw.to_string()),
    }
}
