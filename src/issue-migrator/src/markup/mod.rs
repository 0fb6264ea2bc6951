//! Source markup to target markup conversion.
//!
//! Conversion runs in four stages:
//! 1. [`normalize`] rewrites source constructs the backend handles badly.
//! 2. The [`MarkupBackend`] parses the result into a document tree.
//! 3. [`link_issue_references`] turns bare `#123` runs into issue links.
//! 4. The backend renders the tree and [`fix_up`] repairs its output.

mod backend;
mod error;
mod fixup;
mod links;
mod normalize;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use backend::{MarkupBackend, PandocBackend, DEFAULT_SOURCE_FORMAT, DEFAULT_TARGET_FORMAT};
pub use error::{BackendError, MarkupError};
pub use fixup::fix_up;
pub use links::{issue_url, link_issue_references};
pub use normalize::normalize;

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Converts source markup to target markup through a [`MarkupBackend`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct MarkupConverter {
    backend: Arc<dyn MarkupBackend>,
    tracker_url: String,
}

impl fmt::Debug for MarkupConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupConverter")
            .field("tracker_url", &self.tracker_url)
            .finish_non_exhaustive()
    }
}

impl MarkupConverter {
    /// Creates a converter whose issue links point at `tracker_url`.
    pub fn new(backend: Arc<dyn MarkupBackend>, tracker_url: impl Into<String>) -> Self {
        Self {
            backend,
            tracker_url: tracker_url.into(),
        }
    }

    /// Returns the source tracker base URL.
    pub fn tracker_url(&self) -> &str {
        &self.tracker_url
    }

    /// Converts `source` to target markup.
    ///
    /// Blank input converts to an empty string without touching the backend.
    /// Trailing whitespace is trimmed from the result.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::InvalidMarkup`] when `source` is `None`, and
    /// [`MarkupError::Backend`] with the backend's error when it fails.
    pub fn convert(&self, source: Option<&str>) -> Result<String, MarkupError> {
        let source = source.ok_or(MarkupError::InvalidMarkup)?;
        if source.trim().is_empty() {
            return Ok(String::new());
        }

        let prepared = normalize(source);
        let tree = self.backend.parse(&prepared)?;
        let tree = self.link_tree(tree)?;
        let rendered = self.backend.render(&tree)?;

        Ok(fix_up(&rendered).trim_end().to_string())
    }

    /// Links issue references in the backend's JSON tree.
    ///
    /// A tree nested deeper than the JSON decoder accepts is returned as-is.
    fn link_tree(&self, json: String) -> Result<String, BackendError> {
        match serde_json::from_str::<Value>(&json) {
            Ok(mut tree) => {
                link_issue_references(&mut tree, &self.tracker_url);
                Ok(serde_json::to_string(&tree)?)
            }
            Err(error) if exceeds_nesting_limit(&error) => {
                warn!(%error, "Document tree too deep, skipping issue links");
                Ok(json)
            }
            Err(error) => Err(error.into()),
        }
    }
}

fn exceeds_nesting_limit(error: &serde_json::Error) -> bool {
    error.is_syntax() && error.to_string().starts_with("recursion limit exceeded")
}

#[cfg(test)]
mod tests {
    use super::testing::ParagraphBackend;
    use super::*;

    const TRACKER: &str = "https://tracker.example.org";

    fn converter() -> (Arc<ParagraphBackend>, MarkupConverter) {
        let backend = Arc::new(ParagraphBackend::default());
        let converter = MarkupConverter::new(backend.clone(), TRACKER);
        (backend, converter)
    }

    #[test]
    fn absent_input_is_invalid() {
        let (_, converter) = converter();
        assert!(matches!(
            converter.convert(None),
            Err(MarkupError::InvalidMarkup)
        ));
    }

    #[test]
    fn blank_input_skips_backend() {
        let (backend, converter) = converter();
        assert_eq!(converter.convert(Some("  \r\n ")).unwrap(), "");
        assert_eq!(backend.parse_count(), 0);
    }

    #[test]
    fn bare_reference_becomes_link() {
        let (_, converter) = converter();
        assert_eq!(
            converter.convert(Some("#1234")).unwrap(),
            "[#1234](https://tracker.example.org/issues/1234)"
        );
    }

    #[test]
    fn stack_trace_becomes_single_code_block() {
        let (_, converter) = converter();
        let output = converter
            .convert(Some("Crash:\n#0 main.c(10): boot()\n#1 {main}\nAny idea?"))
            .unwrap();

        assert_eq!(
            output,
            "Crash:\n\n```\n#0 main.c(10): boot()\n#1 {main}\n```\n\nAny idea?"
        );
    }

    #[test]
    fn stack_trace_in_pre_block_is_converted_once() {
        let (_, converter) = converter();
        let output = converter
            .convert(Some("Trace:\n\n<pre>\n#0 a.php(1): f()\n#1 {main}\n</pre>\n\nThanks"))
            .unwrap();

        assert_eq!(
            output,
            "Trace:\n\n```\n#0 a.php(1): f()\n#1 {main}\n```\n\nThanks"
        );
    }

    #[test]
    fn conversion_is_repeatable() {
        let (_, converter) = converter();
        let source = Some("See #12 and commit:deadbeef\n* item");
        assert_eq!(
            converter.convert(source).unwrap(),
            converter.convert(source).unwrap()
        );
    }

    struct FailingBackend;

    impl MarkupBackend for FailingBackend {
        fn parse(&self, _source: &str) -> Result<String, BackendError> {
            Err(BackendError::Failed {
                program: "pandoc".to_string(),
                status: "exit status: 64".to_string(),
                stderr: "unknown reader".to_string(),
            })
        }

        fn render(&self, _tree: &str) -> Result<String, BackendError> {
            unreachable!("parse always fails")
        }
    }

    #[test]
    fn backend_failures_pass_through() {
        let converter = MarkupConverter::new(Arc::new(FailingBackend), TRACKER);

        let error = converter.convert(Some("text")).unwrap_err();

        assert!(matches!(
            error,
            MarkupError::Backend(BackendError::Failed { ref stderr, .. }) if stderr == "unknown reader"
        ));
    }

    const NESTING: usize = 200;

    /// Emits a quote nested far deeper than the JSON decoder accepts.
    struct DeepQuoteBackend;

    impl MarkupBackend for DeepQuoteBackend {
        fn parse(&self, _source: &str) -> Result<String, BackendError> {
            let open = r#"{"t":"BlockQuote","c":["#.repeat(NESTING);
            let close = "]}".repeat(NESTING);
            Ok(format!(
                r##"{{"pandoc-api-version":[1,23],"meta":{{}},"blocks":[{open}{{"t":"Para","c":[{{"t":"Str","c":"#12"}}]}}{close}]}}"##
            ))
        }

        fn render(&self, tree: &str) -> Result<String, BackendError> {
            assert_eq!(tree, self.parse("")?);
            Ok(format!("{}#12\n", "> ".repeat(NESTING)))
        }
    }

    #[test]
    fn overly_deep_tree_renders_without_links() {
        let converter = MarkupConverter::new(Arc::new(DeepQuoteBackend), TRACKER);

        let output = converter.convert(Some("bq. #12")).unwrap();

        assert!(output.ends_with("> #12"));
        assert!(!output.contains("/issues/12"));
    }

    struct BrokenTreeBackend;

    impl MarkupBackend for BrokenTreeBackend {
        fn parse(&self, _source: &str) -> Result<String, BackendError> {
            Ok("{\"blocks\": [".to_string())
        }

        fn render(&self, _tree: &str) -> Result<String, BackendError> {
            unreachable!("tree never decodes")
        }
    }

    #[test]
    fn truncated_tree_is_an_error() {
        let converter = MarkupConverter::new(Arc::new(BrokenTreeBackend), TRACKER);

        let error = converter.convert(Some("text")).unwrap_err();

        assert!(matches!(
            error,
            MarkupError::Backend(BackendError::InvalidTree(_))
        ));
    }
}
