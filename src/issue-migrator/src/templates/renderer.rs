//! Template renderer.

use super::{TemplateError, DEFAULT_HEADER_TEMPLATE, REDIRECT_NOTICE_TEMPLATE};
use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde::Serialize;
use serde_json::json;

/// Placeholder for unset header values.
pub const NONE_PLACEHOLDER: &str = "(none)";

// Source trackers are inconsistent about the case of status and tracker
// names, so templates compare them the way label rules do.
handlebars_helper!(same_name: |a: str, b: str| a.trim().eq_ignore_ascii_case(b.trim()));

/// Builds the registry shared by the title, header and notice templates.
///
/// Output is markdown, so nothing is HTML-escaped. Strict mode turns a
/// misspelled variable in a user template into an error instead of an empty
/// string. `same` compares two names ignoring case and surrounding space:
/// `{{#if (same tracker "bug")}}`.
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(no_escape);
    registry.set_strict_mode(true);
    registry.register_helper("same", Box::new(same_name));
    registry
}

/// Variables of the title format.
#[derive(Debug, Clone, Serialize)]
pub struct TitleData<'a> {
    pub source_name: &'a str,
    pub id: u64,
    pub subject: &'a str,
    pub tracker: &'a str,
}

/// Variables of the metadata header.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderData {
    pub source_name: String,
    pub issue_url: String,
    pub id: u64,
    pub author: String,
    /// Assignee name, or [`NONE_PLACEHOLDER`].
    pub assignee: String,
    pub status: String,
    /// Target version name, or [`NONE_PLACEHOLDER`].
    pub target_version: String,
    pub created_on: String,
    /// Empty unless the issue is closed.
    pub closed_on: String,
    pub updated_on: String,
}

/// Template renderer for titles, headers and notices.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer").finish_non_exhaustive()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders an issue title.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid or references an unknown
    /// variable.
    pub fn render_title(&self, format: &str, data: &TitleData<'_>) -> Result<String, TemplateError> {
        Ok(self.render_template(format, data)?.trim().to_string())
    }

    /// Renders the metadata header, using [`DEFAULT_HEADER_TEMPLATE`] when
    /// `template` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_header(
        &self,
        template: Option<&str>,
        data: &HeaderData,
    ) -> Result<String, TemplateError> {
        self.render_template(template.unwrap_or(DEFAULT_HEADER_TEMPLATE), data)
    }

    /// Renders the notice that points source-tracker readers at the
    /// migrated issue.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_redirect_notice(
        &self,
        target_name: &str,
        url: &str,
    ) -> Result<String, TemplateError> {
        let data = json!({
            "target_name": target_name,
            "url": url,
        });
        self.render_template(REDIRECT_NOTICE_TEMPLATE, &data)
    }

    /// Checks that `template` parses, without rendering it.
    ///
    /// # Errors
    ///
    /// Returns an error if the template has invalid syntax.
    pub fn validate(template: &str) -> Result<(), TemplateError> {
        handlebars::Template::compile(template)?;
        Ok(())
    }

    /// Renders a template with the given data.
    fn render_template<T: Serialize>(&self, template: &str, data: &T) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}
