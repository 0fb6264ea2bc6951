//! Orchestrates a migration run over dumped issues.
//!
//! Issues are composed concurrently on blocking workers that share one
//! [`Composer`]. Outputs are written afterwards in issue-id order, so a run
//! over unchanged dumps rewrites byte-identical files.

mod config;
mod error;
mod input;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::compose::Composer;
use crate::config::MigratorConfig;
use crate::lookup::{missing_references, LookupTables, ResolvePolicy};
use crate::markup::MarkupBackend;
use crate::milestones::Milestone;
use crate::model::TargetDocument;
use crate::summary::{ProcessingResult, RunSummary};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// File the synthesized milestones are written to.
pub const MILESTONES_FILE: &str = "milestones.json";

/// Orchestrates a full migration run.
#[derive(Debug)]
pub struct Runner {
    config: RunnerConfig,
    settings: MigratorConfig,
    composer: Arc<Composer>,
    milestones: Vec<Milestone>,
}

impl Runner {
    /// Builds a runner converting markup with the configured pandoc.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration or the enumeration dump
    /// cannot be loaded.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let settings = MigratorConfig::load(config.config_path())?;
        let backend = Arc::new(settings.backend());
        Self::build(config, settings, backend)
    }

    /// Builds a runner converting markup with `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration or the enumeration dump
    /// cannot be loaded.
    pub fn with_backend(
        config: RunnerConfig,
        backend: Arc<dyn MarkupBackend>,
    ) -> Result<Self, RunnerError> {
        let settings = MigratorConfig::load(config.config_path())?;
        Self::build(config, settings, backend)
    }

    fn build(
        config: RunnerConfig,
        settings: MigratorConfig,
        backend: Arc<dyn MarkupBackend>,
    ) -> Result<Self, RunnerError> {
        info!(path = %config.lookups_path().display(), "Loading lookup tables");
        let enumerations = input::load_enumerations(config.lookups_path())?;
        let tables = Arc::new(LookupTables::from_enumerations(&enumerations));
        debug!(
            statuses = tables.statuses.len(),
            users = tables.users.len(),
            versions = tables.versions.len(),
            "Built lookup tables"
        );

        let milestones = enumerations
            .versions
            .iter()
            .map(|version| Milestone::from_version(version, &settings.source_name))
            .collect();
        let composer = Arc::new(Composer::new(tables, settings.compose_options(), backend));

        Ok(Self {
            config,
            settings,
            composer,
            milestones,
        })
    }

    /// Returns the loaded migration settings.
    pub fn settings(&self) -> &MigratorConfig {
        &self.settings
    }

    /// Returns the shared composer.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Executes the full run.
    ///
    /// A failing issue is recorded in the summary and the run continues.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the issue directory cannot be listed or the
    /// output directory cannot be created.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());

        info!(path = %self.config.issues_path().display(), "Scanning issue dumps");
        let files =
            input::discover_issue_files(self.config.issues_path(), self.config.issue_ids())?;
        summary.issues_discovered = files.found.len();

        for issue_id in &files.missing {
            warn!(issue_id = *issue_id, "No dump found for requested issue");
            summary.record_result(&ProcessingResult::Skipped {
                issue_id: *issue_id,
                reason: "no dump found".to_string(),
            });
        }

        if files.found.is_empty() {
            warn!("No issue dumps found");
        } else {
            info!(count = files.found.len(), "Found issue dumps");
        }

        if !self.config.dry_run() {
            create_dir(self.config.output_path())?;
        }

        let mut outcomes: Vec<(u64, Result<TargetDocument, String>)> = stream::iter(files.found)
            .map(|(issue_id, path)| {
                let composer = Arc::clone(&self.composer);
                compose_issue(composer, issue_id, path).instrument(info_span!("issue", issue_id))
            })
            .buffer_unordered(self.config.concurrency())
            .collect()
            .await;
        outcomes.sort_by_key(|(issue_id, _)| *issue_id);

        for (issue_id, outcome) in outcomes {
            let result = match outcome.map(|document| (self.emit_document(&document), document)) {
                Ok((Ok(()), document)) => {
                    info!(issue_id, title = %document.title, "Composed issue");
                    ProcessingResult::Composed {
                        issue_id,
                        title: document.title,
                    }
                }
                Ok((Err(e), _)) => {
                    error!(issue_id, error = %e, "Failed to write issue");
                    ProcessingResult::Failed {
                        issue_id,
                        error: e.to_string(),
                    }
                }
                Err(e) => {
                    error!(issue_id, error = %e, "Failed to compose issue");
                    ProcessingResult::Failed { issue_id, error: e }
                }
            };
            summary.record_result(&result);
        }

        summary.milestones_written = self.emit_milestones()?;

        Ok(summary)
    }

    fn emit_document(&self, document: &TargetDocument) -> Result<(), RunnerError> {
        if self.config.dry_run() {
            println!("\n[DRY RUN] Issue #{}", document.source_id);
            println!("{}", document.render());
            return Ok(());
        }

        let output = self.config.output_path();
        write_json(&output.join(format!("{}.json", document.source_id)), document)?;
        write_file(
            &output.join(format!("{}.md", document.source_id)),
            &document.render(),
        )
    }

    fn emit_milestones(&self) -> Result<usize, RunnerError> {
        if self.milestones.is_empty() {
            return Ok(0);
        }

        if self.config.dry_run() {
            for milestone in &self.milestones {
                println!("\n[DRY RUN] Milestone");
                println!("{}", milestone.render());
            }
        } else {
            write_json(
                &self.config.output_path().join(MILESTONES_FILE),
                &self.milestones,
            )?;
        }

        info!(count = self.milestones.len(), "Synthesized milestones");
        Ok(self.milestones.len())
    }
}

/// Loads and composes one issue on a blocking worker.
async fn compose_issue(
    composer: Arc<Composer>,
    issue_id: u64,
    path: PathBuf,
) -> (u64, Result<TargetDocument, String>) {
    let span = tracing::Span::current();
    let task = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();

        let issue = input::load_issue(&path).map_err(|e| e.to_string())?;
        if issue.id != issue_id {
            warn!(record_id = issue.id, "Dump file name does not match the issue id");
        }

        if composer.options().resolve_policy == ResolvePolicy::Lenient {
            for (kind, id) in missing_references(&issue, composer.tables()) {
                warn!(%kind, id, "Unresolved reference, keeping the raw value");
            }
        }

        debug!(journals = issue.journals.len(), "Composing document");
        composer.compose(&issue).map_err(|e| e.to_string())
    });

    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(e) => Err(format!("composition task failed: {e}")),
    };
    (issue_id, outcome)
}

fn create_dir(path: &Path) -> Result<(), RunnerError> {
    std::fs::create_dir_all(path).map_err(|e| RunnerError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), RunnerError> {
    std::fs::write(path, content).map_err(|e| RunnerError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RunnerError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| RunnerError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;
    json.push('\n');
    write_file(path, &json)
}
