//! Template rendering using Handlebars.
//!
//! Titles, the metadata header and the redirect notice are handlebars
//! templates so a migration can reword them without code changes.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{
    create_handlebars_registry, HeaderData, TemplateRenderer, TitleData, NONE_PLACEHOLDER,
};

/// Default title format.
pub const DEFAULT_TITLE_FORMAT: &str = "[{{source_name}} #{{id}}] {{subject}}";

/// Default metadata header. Every variable of [`HeaderData`] is available;
/// optional values are empty strings when unset.
pub const DEFAULT_HEADER_TEMPLATE: &str = "\
This issue has been migrated from {{source_name}}: {{issue_url}}

Author: {{author}}
Assignee: {{assignee}}
Status: {{status}}
Target Version: {{target_version}}
Created: {{created_on}}{{#if closed_on}} (closed on {{closed_on}}){{/if}}
Last Update: {{updated_on}}";

/// Comment posted back on the source issue once it has been migrated.
pub const REDIRECT_NOTICE_TEMPLATE: &str = "\
This issue has been migrated to {{target_name}}.

If you want to keep following the status, please ensure you subscribe to the {{target_name}} issue:

{{url}}
";
