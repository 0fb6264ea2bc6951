//! Composition options.

use crate::labels::LabelRules;
use crate::lookup::ResolvePolicy;
use crate::templates::DEFAULT_TITLE_FORMAT;
use std::collections::BTreeMap;

/// Default source system name.
pub const DEFAULT_SOURCE_NAME: &str = "Redmine";

/// Options that shape a composed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Source system name, used by the title and the header.
    pub source_name: String,

    /// Base URL of the source tracker.
    pub tracker_url: String,

    /// Handlebars title format.
    pub title_format: String,

    /// Handlebars header override. `None` uses the built-in header.
    pub header_template: Option<String>,

    /// Inline the change history into the body instead of returning it as
    /// separate comments.
    pub inline_comments: bool,

    /// Source user name to target login.
    pub user_map: BTreeMap<String, String>,

    /// Label rule table.
    pub label_rules: LabelRules,

    /// Handling of ids missing from the lookup tables.
    pub resolve_policy: ResolvePolicy,
}

impl ComposeOptions {
    /// Creates options with defaults for everything but the tracker URL.
    pub fn new(tracker_url: impl Into<String>) -> Self {
        Self {
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            tracker_url: tracker_url.into(),
            title_format: DEFAULT_TITLE_FORMAT.to_string(),
            header_template: None,
            inline_comments: true,
            user_map: BTreeMap::new(),
            label_rules: LabelRules::default(),
            resolve_policy: ResolvePolicy::Lenient,
        }
    }
}
