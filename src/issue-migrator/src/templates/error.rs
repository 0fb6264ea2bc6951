//! Template rendering error types.

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// Template syntax error.
    #[error("Template syntax error: {0}")]
    SyntaxError(#[from] handlebars::TemplateError),
}
