#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod compose;
pub mod config;
pub mod journal;
pub mod labels;
pub mod lookup;
pub mod markup;
pub mod milestones;
pub mod model;
pub mod names;
pub mod runner;
pub mod summary;
pub mod templates;

pub use compose::{compose, ComposeError, ComposeOptions, Composer, IssueDocument};
pub use config::{ConfigError, MigratorConfig, PandocSettings};
pub use journal::{JournalContext, JournalError};
pub use labels::{classify, Classification, ClassifyError, LabelRules, TrackerPolicy};
pub use lookup::{
    Enumerations, LookupKind, LookupTable, LookupTables, ResolveError, ResolvePolicy, Resolver,
};
pub use markup::{BackendError, MarkupBackend, MarkupConverter, MarkupError, PandocBackend};
pub use milestones::Milestone;
pub use model::{Comment, IssueState, SourceIssue, TargetDocument};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{ProcessingResult, RunSummary};
pub use templates::{create_handlebars_registry, TemplateError, TemplateRenderer};
