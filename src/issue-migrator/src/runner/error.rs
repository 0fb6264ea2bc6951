//! Runner error types.

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Failed to read or write a file.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A dump is not valid JSON of the expected shape.
    #[error("Invalid JSON in '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required directory does not exist.
    #[error("Missing directory: {path}")]
    MissingDirectory { path: String },
}
