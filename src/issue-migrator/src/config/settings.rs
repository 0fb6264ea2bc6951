//! Migration settings deserialization.

use crate::compose::{ComposeOptions, DEFAULT_SOURCE_NAME};
use crate::config::ConfigError;
use crate::labels::LabelRules;
use crate::lookup::ResolvePolicy;
use crate::markup::{PandocBackend, DEFAULT_SOURCE_FORMAT, DEFAULT_TARGET_FORMAT};
use crate::templates::{TemplateRenderer, DEFAULT_TITLE_FORMAT};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed contents of a `migrator.toml` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MigratorConfig {
    /// Name of the source tracker, shown in titles and headers.
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Name of the target system, used by the redirect notice.
    #[serde(default = "default_target_name")]
    pub target_name: String,

    /// Base URL of the source tracker.
    pub tracker_url: String,

    /// Handlebars format for issue titles.
    #[serde(default = "default_title_format")]
    pub title_format: String,

    /// Handlebars override of the metadata header.
    #[serde(default)]
    pub header_template: Option<String>,

    /// Inline the change history into the issue body.
    #[serde(default = "default_inline_comments")]
    pub inline_comments: bool,

    /// Fail on ids missing from the lookup tables instead of keeping them raw.
    #[serde(default)]
    pub strict_references: bool,

    /// Label rule table.
    #[serde(default)]
    pub labels: LabelRules,

    /// Source user name to target login.
    #[serde(default)]
    pub user_map: BTreeMap<String, String>,

    /// Markup converter settings.
    #[serde(default)]
    pub pandoc: PandocSettings,
}

/// The `[pandoc]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PandocSettings {
    /// Executable name or path.
    pub program: String,

    /// Pandoc reader for source markup.
    pub source_format: String,

    /// Pandoc writer for target markup.
    pub target_format: String,
}

impl Default for PandocSettings {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
            source_format: DEFAULT_SOURCE_FORMAT.to_string(),
            target_format: DEFAULT_TARGET_FORMAT.to_string(),
        }
    }
}

pub(crate) fn default_source_name() -> String {
    DEFAULT_SOURCE_NAME.to_string()
}

pub(crate) fn default_target_name() -> String {
    "GitHub".to_string()
}

pub(crate) fn default_title_format() -> String {
    DEFAULT_TITLE_FORMAT.to_string()
}

pub(crate) fn default_inline_comments() -> bool {
    true
}

impl MigratorConfig {
    /// Parses a configuration from TOML text. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlError`] if the text is not a valid
    /// configuration.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if a value is unusable.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        let tracker_url = url::Url::parse(&self.tracker_url)
            .map_err(|e| invalid(format!("tracker-url '{}' is not a URL: {e}", self.tracker_url)))?;
        if !matches!(tracker_url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "tracker-url must use http or https, got '{}'",
                tracker_url.scheme()
            )));
        }

        if self.source_name.trim().is_empty() {
            return Err(invalid("source-name cannot be empty".to_string()));
        }

        if self.target_name.trim().is_empty() {
            return Err(invalid("target-name cannot be empty".to_string()));
        }

        TemplateRenderer::validate(&self.title_format)
            .map_err(|e| invalid(format!("title-format is invalid: {e}")))?;

        if let Some(header) = &self.header_template {
            TemplateRenderer::validate(header)
                .map_err(|e| invalid(format!("header-template is invalid: {e}")))?;
        }

        if self.pandoc.program.trim().is_empty() {
            return Err(invalid("pandoc.program cannot be empty".to_string()));
        }

        if let Some((user, _)) = self
            .user_map
            .iter()
            .find(|(_, login)| login.trim().is_empty())
        {
            return Err(invalid(format!("user-map entry '{user}' has an empty login")));
        }

        Ok(())
    }

    /// Returns the composition options this configuration describes.
    #[must_use]
    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            source_name: self.source_name.clone(),
            tracker_url: self.tracker_url.trim_end_matches('/').to_string(),
            title_format: self.title_format.clone(),
            header_template: self.header_template.clone(),
            inline_comments: self.inline_comments,
            user_map: self.user_map.clone(),
            label_rules: self.labels.clone(),
            resolve_policy: if self.strict_references {
                ResolvePolicy::Strict
            } else {
                ResolvePolicy::Lenient
            },
        }
    }

    /// Returns the pandoc backend this configuration describes.
    #[must_use]
    pub fn backend(&self) -> PandocBackend {
        PandocBackend::new(&self.pandoc.program)
            .with_formats(&self.pandoc.source_format, &self.pandoc.target_format)
    }
}
