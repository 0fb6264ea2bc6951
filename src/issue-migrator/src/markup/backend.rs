//! Document converter backends.

use super::BackendError;
use std::io::Write;
use std::process::{Command, Stdio};

/// A source-markup to target-markup converter working through a structured
/// document tree.
///
/// The tree travels as pandoc JSON text so tree-level fix-ups can be applied
/// between the two halves of the conversion, and so a tree too deep to decode
/// can still be rendered as it came.
pub trait MarkupBackend: Send + Sync {
    /// Parses source markup into a pandoc JSON document tree.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the source cannot be parsed.
    fn parse(&self, source: &str) -> Result<String, BackendError>;

    /// Renders a pandoc JSON document tree as target markup.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the tree cannot be rendered.
    fn render(&self, tree: &str) -> Result<String, BackendError>;
}

/// Default source format passed to pandoc.
pub const DEFAULT_SOURCE_FORMAT: &str = "textile";

/// Default target format passed to pandoc.
pub const DEFAULT_TARGET_FORMAT: &str = "gfm";

/// Runs the `pandoc` executable for each half of the conversion.
#[derive(Debug, Clone)]
pub struct PandocBackend {
    program: String,
    source_format: String,
    target_format: String,
}

impl Default for PandocBackend {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl PandocBackend {
    /// Creates a backend running `program` with the default formats.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            source_format: DEFAULT_SOURCE_FORMAT.to_string(),
            target_format: DEFAULT_TARGET_FORMAT.to_string(),
        }
    }

    /// Sets the pandoc reader and writer formats.
    #[must_use]
    pub fn with_formats(
        mut self,
        source_format: impl Into<String>,
        target_format: impl Into<String>,
    ) -> Self {
        self.source_format = source_format.into();
        self.target_format = target_format.into();
        self
    }

    /// Returns the executable this backend runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs pandoc with `args`, feeding `input` on stdin.
    fn run(&self, args: &[&str], input: &[u8]) -> Result<String, BackendError> {
        let spawn_error = |source| BackendError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from a separate thread so a full stdout pipe cannot
        // deadlock the child.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error(std::io::Error::other("stdin is not piped")))?;
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            output.and_then(|output| written.map(|()| output))
        })
        .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(BackendError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| BackendError::InvalidUtf8 {
            program: self.program.clone(),
        })
    }
}

impl MarkupBackend for PandocBackend {
    fn parse(&self, source: &str) -> Result<String, BackendError> {
        self.run(
            &["-f", &self.source_format, "-t", "json"],
            source.as_bytes(),
        )
    }

    fn render(&self, tree: &str) -> Result<String, BackendError> {
        self.run(
            &["-f", "json", "-t", &self.target_format, "--wrap=preserve"],
            tree.as_bytes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let backend = PandocBackend::new("definitely-not-an-installed-converter");

        let result = backend.parse("h1. Title");

        assert!(matches!(result, Err(BackendError::Spawn { .. })));
    }

    #[test]
    fn formats_are_configurable() {
        let backend = PandocBackend::default().with_formats("mediawiki", "commonmark");

        assert_eq!(backend.program(), "pandoc");
        assert_eq!(backend.source_format, "mediawiki");
        assert_eq!(backend.target_format, "commonmark");
    }
}
