//! Target document composition.
//!
//! [`Composer`] holds everything shared across a run. [`IssueDocument`]
//! derives the parts of one issue's document lazily and memoizes them, so
//! repeated composition never converts the same markup twice.

mod error;
mod options;
mod sections;

pub use error::ComposeError;
pub use options::{ComposeOptions, DEFAULT_SOURCE_NAME};
pub use sections::SECTION_SEPARATOR;

use crate::journal::{self, format_timestamp, JournalContext};
use crate::labels::{classify, Classification};
use crate::lookup::{LookupTables, Resolver};
use crate::markup::{issue_url, MarkupBackend, MarkupConverter};
use crate::model::{Comment, IssueState, SourceIssue, TargetDocument};
use crate::templates::{HeaderData, TemplateRenderer, TitleData, NONE_PLACEHOLDER};
use once_cell::unsync::OnceCell;
use std::sync::Arc;

/// Shared, read-only composition state for one migration run.
#[derive(Debug)]
pub struct Composer {
    tables: Arc<LookupTables>,
    options: ComposeOptions,
    converter: MarkupConverter,
    renderer: TemplateRenderer,
}

impl Composer {
    /// Creates a composer converting markup through `backend`.
    pub fn new(
        tables: Arc<LookupTables>,
        options: ComposeOptions,
        backend: Arc<dyn MarkupBackend>,
    ) -> Self {
        let converter = MarkupConverter::new(backend, options.tracker_url.clone());
        Self {
            tables,
            options,
            converter,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Returns the lookup tables.
    #[must_use]
    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Returns the composition options.
    #[must_use]
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Returns the markup converter.
    #[must_use]
    pub fn converter(&self) -> &MarkupConverter {
        &self.converter
    }

    /// Returns the renderer for titles, headers and notices.
    #[must_use]
    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// Starts a lazily derived document for `issue`.
    #[must_use]
    pub fn document<'a>(&'a self, issue: &'a SourceIssue) -> IssueDocument<'a> {
        IssueDocument::new(
            issue,
            &self.tables,
            &self.options,
            &self.converter,
            &self.renderer,
        )
    }

    /// Composes the target document of `issue`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ComposeError`] hit while deriving any part.
    pub fn compose(&self, issue: &SourceIssue) -> Result<TargetDocument, ComposeError> {
        self.document(issue).compose()
    }
}

/// Composes the target document of `issue` in one call.
///
/// # Errors
///
/// Returns the first [`ComposeError`] hit while deriving any part.
pub fn compose(
    issue: &SourceIssue,
    tables: &LookupTables,
    options: &ComposeOptions,
    converter: &MarkupConverter,
) -> Result<TargetDocument, ComposeError> {
    let renderer = TemplateRenderer::new();
    IssueDocument::new(issue, tables, options, converter, &renderer).compose()
}

/// The target document of one issue, derived on demand.
///
/// Each part is computed at most once. An instance belongs to a single
/// migration task and is not shared between threads.
#[derive(Debug)]
pub struct IssueDocument<'a> {
    issue: &'a SourceIssue,
    tables: &'a LookupTables,
    options: &'a ComposeOptions,
    converter: &'a MarkupConverter,
    renderer: &'a TemplateRenderer,
    title: OnceCell<String>,
    classification: OnceCell<Classification>,
    history: OnceCell<Vec<Comment>>,
    description: OnceCell<Option<String>>,
    body: OnceCell<String>,
    document: OnceCell<TargetDocument>,
}

impl<'a> IssueDocument<'a> {
    /// Creates a document with nothing derived yet.
    pub fn new(
        issue: &'a SourceIssue,
        tables: &'a LookupTables,
        options: &'a ComposeOptions,
        converter: &'a MarkupConverter,
        renderer: &'a TemplateRenderer,
    ) -> Self {
        Self {
            issue,
            tables,
            options,
            converter,
            renderer,
            title: OnceCell::new(),
            classification: OnceCell::new(),
            history: OnceCell::new(),
            description: OnceCell::new(),
            body: OnceCell::new(),
            document: OnceCell::new(),
        }
    }

    /// Returns the source issue.
    #[must_use]
    pub fn issue(&self) -> &SourceIssue {
        self.issue
    }

    /// The rendered title.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Template`] if the title format fails.
    pub fn title(&self) -> Result<&str, ComposeError> {
        self.title
            .get_or_try_init(|| {
                let data = TitleData {
                    source_name: &self.options.source_name,
                    id: self.issue.id,
                    subject: &self.issue.subject,
                    tracker: &self.issue.tracker.name,
                };
                self.renderer.render_title(&self.options.title_format, &data)
            })
            .map(String::as_str)
            .map_err(ComposeError::from)
    }

    /// Labels and state.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Classify`] if the tracker is rejected.
    pub fn classification(&self) -> Result<&Classification, ComposeError> {
        self.classification
            .get_or_try_init(|| classify(self.issue, self.tables, &self.options.label_rules))
            .map_err(ComposeError::from)
    }

    /// One rendered change-log entry per journal entry.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Journal`] if any entry fails to render.
    pub fn history(&self) -> Result<&[Comment], ComposeError> {
        self.history
            .get_or_try_init(|| {
                let context = JournalContext {
                    issue: self.issue,
                    resolver: Resolver::new(self.tables, self.options.resolve_policy),
                    converter: self.converter,
                };
                journal::render(&self.issue.journals, &context)
            })
            .map(Vec::as_slice)
            .map_err(ComposeError::from)
    }

    /// The converted description, `None` when absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Markup`] if conversion fails.
    pub fn description(&self) -> Result<Option<&str>, ComposeError> {
        self.description
            .get_or_try_init(|| match self.issue.description.as_deref() {
                Some(source) => self
                    .converter
                    .convert(Some(source))
                    .map(|text| Some(text).filter(|text| !text.is_empty())),
                None => Ok(None),
            })
            .map(Option::as_deref)
            .map_err(ComposeError::from)
    }

    /// Target login of the assignee, if the user map knows them.
    ///
    /// The issue's own assignee name is tried first, then the name the
    /// lookup tables give for the assignee id.
    #[must_use]
    pub fn assignee(&self) -> Option<String> {
        let assigned = self.issue.assigned_to.as_ref()?;
        let user_map = &self.options.user_map;

        user_map
            .get(&assigned.name)
            .or_else(|| {
                self.tables
                    .users
                    .get(&assigned.id)
                    .and_then(|name| user_map.get(name))
            })
            .cloned()
    }

    /// Name of the target version.
    #[must_use]
    pub fn milestone(&self) -> Option<String> {
        let version = self.issue.fixed_version.as_ref()?;
        if version.name.is_empty() {
            self.tables.versions.get(&version.id).cloned()
        } else {
            Some(version.name.clone())
        }
    }

    fn closed_on(&self) -> Result<Option<chrono::DateTime<chrono::Utc>>, ComposeError> {
        Ok(match self.classification()?.state {
            IssueState::Closed => self.issue.closed_on,
            IssueState::Open => None,
        })
    }

    fn header(&self) -> Result<String, ComposeError> {
        let issue = self.issue;
        let data = HeaderData {
            source_name: self.options.source_name.clone(),
            issue_url: issue_url(&self.options.tracker_url, &issue.id.to_string()),
            id: issue.id,
            author: issue.author.name.clone(),
            assignee: issue
                .assigned_to
                .as_ref()
                .map_or_else(|| NONE_PLACEHOLDER.to_string(), |user| user.name.clone()),
            status: issue.status.name.clone(),
            target_version: self
                .milestone()
                .unwrap_or_else(|| NONE_PLACEHOLDER.to_string()),
            created_on: format_timestamp(&issue.created_on),
            closed_on: self
                .closed_on()?
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default(),
            updated_on: format_timestamp(&issue.updated_on),
        };

        let header = self
            .renderer
            .render_header(self.options.header_template.as_deref(), &data)?;
        Ok(sections::indent(&header))
    }

    /// The body: header, custom fields, description, relations,
    /// attachments and, when inlined, the change history.
    ///
    /// # Errors
    ///
    /// Returns the first [`ComposeError`] hit by any section.
    pub fn body(&self) -> Result<&str, ComposeError> {
        self.body
            .get_or_try_init(|| {
                let mut parts = vec![self.header()?];
                parts.extend(sections::custom_fields(self.issue));
                parts.extend(self.description()?.map(str::to_string));
                parts.extend(sections::relations(
                    self.issue,
                    &self.options.tracker_url,
                ));
                parts.extend(sections::attachments(self.issue));
                if self.options.inline_comments {
                    parts.extend(self.history()?.iter().map(|entry| entry.body.clone()));
                }
                Ok(parts.join(SECTION_SEPARATOR))
            })
            .map(String::as_str)
    }

    /// Standalone comments; empty when the history is inlined.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Journal`] if any entry fails to render.
    pub fn comments(&self) -> Result<Vec<Comment>, ComposeError> {
        if self.options.inline_comments {
            Ok(Vec::new())
        } else {
            Ok(self.history()?.to_vec())
        }
    }

    /// Assembles the full document. The result is frozen after the first
    /// successful call.
    ///
    /// # Errors
    ///
    /// Returns the first [`ComposeError`] hit while deriving any part.
    pub fn compose(&self) -> Result<TargetDocument, ComposeError> {
        self.document
            .get_or_try_init(|| {
                let classification = self.classification()?;
                Ok::<_, ComposeError>(TargetDocument {
                    source_id: self.issue.id,
                    title: self.title()?.to_string(),
                    labels: classification.labels.clone(),
                    state: classification.state,
                    assignee: self.assignee(),
                    milestone: self.milestone(),
                    body: self.body()?.to_string(),
                    comments: self.comments()?,
                    created_at: self.issue.created_on,
                    updated_at: self.issue.updated_on,
                    closed_at: self.closed_on()?,
                })
            })
            .cloned()
    }
}
