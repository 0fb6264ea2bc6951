//! Markup conversion error types.

use thiserror::Error;

/// Failures raised by a markup backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The converter process could not be started or fed.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter process exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The converter produced output that is not valid UTF-8.
    #[error("'{program}' produced output that is not valid UTF-8")]
    InvalidUtf8 { program: String },

    /// The document tree could not be encoded or decoded.
    #[error("Invalid document tree: {0}")]
    InvalidTree(#[from] serde_json::Error),
}

/// Errors that can occur while converting markup.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// No markup was supplied.
    #[error("Markup input is absent")]
    InvalidMarkup,

    /// The backend failed; passed through unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
