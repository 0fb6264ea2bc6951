//! Configuration loading.
//!
//! A migration is described by one `migrator.toml` file:
//! ```toml
//! tracker-url = "https://dev.example.org"
//! inline-comments = false
//!
//! [labels]
//! default-priority = "Normal"
//! unmapped-tracker = "pass-through"
//!
//! [labels.trackers]
//! Bug = "bug"
//!
//! [user-map]
//! "Jane Doe" = "jdoe"
//! ```

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{MigratorConfig, PandocSettings};

use std::path::Path;
use tracing::{debug, info};

/// Environment variable that overrides `pandoc.program`.
pub const PANDOC_ENV: &str = "ISSUE_MIGRATOR_PANDOC";

impl MigratorConfig {
    /// Loads and validates a configuration file.
    ///
    /// `ISSUE_MIGRATOR_PANDOC`, when set and non-empty, replaces the
    /// configured pandoc executable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, invalid
    /// TOML, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut config = Self::parse(&content, path)?;

        if let Some(program) = std::env::var(PANDOC_ENV)
            .ok()
            .filter(|program| !program.trim().is_empty())
        {
            debug!(program = %program, "Pandoc program overridden from environment");
            config.pandoc.program = program;
        }

        config.validate(path)?;

        info!(
            tracker_url = %config.tracker_url,
            inline_comments = config.inline_comments,
            strict_references = config.strict_references,
            "Loaded configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::TrackerPolicy;
    use crate::lookup::ResolvePolicy;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("migrator.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_minimal_config_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"tracker-url = "https://dev.example.org/""#);

        let config = temp_env::with_var_unset(PANDOC_ENV, || MigratorConfig::load(&path)).unwrap();

        assert_eq!(config.source_name, "Redmine");
        assert_eq!(config.target_name, "GitHub");
        assert!(config.inline_comments);
        assert!(!config.strict_references);
        assert_eq!(config.pandoc, PandocSettings::default());
        assert_eq!(config.labels.default_priority.as_deref(), Some("Normal"));
        assert_eq!(config.labels.trackers.get("Defect").map(String::as_str), Some("bug"));

        let options = config.compose_options();
        assert_eq!(options.tracker_url, "https://dev.example.org");
        assert_eq!(options.resolve_policy, ResolvePolicy::Lenient);
    }

    #[test]
    fn loads_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
source-name = "Acme Redmine"
tracker-url = "https://dev.example.org"
title-format = "{{subject}} (#{{id}})"
inline-comments = false
strict-references = true

[labels]
default-priority = "Low"
unmapped-tracker = "reject"

[labels.statuses]
"Needs Info" = "needs-info"

[labels.trackers]
Bug = "type: bug"

[user-map]
"Jane Doe" = "jdoe"

[pandoc]
program = "/opt/pandoc/bin/pandoc"
target-format = "markdown_github"
"#,
        );

        let config = temp_env::with_var_unset(PANDOC_ENV, || MigratorConfig::load(&path)).unwrap();

        assert_eq!(config.source_name, "Acme Redmine");
        assert_eq!(config.labels.unmapped_tracker, TrackerPolicy::Reject);
        assert_eq!(config.labels.statuses.len(), 1);
        assert_eq!(config.labels.trackers.get("Feature"), None);
        assert_eq!(config.pandoc.source_format, "textile");
        assert_eq!(config.pandoc.target_format, "markdown_github");

        let options = config.compose_options();
        assert!(!options.inline_comments);
        assert_eq!(options.resolve_policy, ResolvePolicy::Strict);
        assert_eq!(options.user_map.get("Jane Doe").map(String::as_str), Some("jdoe"));
        assert_eq!(config.backend().program(), "/opt/pandoc/bin/pandoc");
    }

    #[test]
    fn environment_overrides_pandoc_program() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"tracker-url = "https://dev.example.org""#);

        let config = temp_env::with_var(PANDOC_ENV, Some("/usr/local/bin/pandoc"), || {
            MigratorConfig::load(&path)
        })
        .unwrap();

        assert_eq!(config.pandoc.program, "/usr/local/bin/pandoc");
    }

    #[test]
    fn missing_file() {
        let temp = TempDir::new().unwrap();

        let result = MigratorConfig::load(&temp.path().join("missing.toml"));

        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn missing_tracker_url_is_toml_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"source-name = "Redmine""#);

        let result = MigratorConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn rejects_non_http_tracker_url() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"tracker-url = "ftp://dev.example.org""#);

        let result = temp_env::with_var_unset(PANDOC_ENV, || MigratorConfig::load(&path));

        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref message, .. }) if message.contains("http")
        ));
    }

    #[test]
    fn rejects_broken_title_format() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
tracker-url = "https://dev.example.org"
title-format = "{{#if subject}}unclosed"
"#,
        );

        let result = temp_env::with_var_unset(PANDOC_ENV, || MigratorConfig::load(&path));

        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref message, .. }) if message.contains("title-format")
        ));
    }

    #[test]
    fn rejects_empty_user_login() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
tracker-url = "https://dev.example.org"

[user-map]
alice = ""
"#,
        );

        let result = temp_env::with_var_unset(PANDOC_ENV, || MigratorConfig::load(&path));

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
