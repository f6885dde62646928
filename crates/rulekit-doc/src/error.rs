//! Error types for document parsing and rendering.

/// Errors raised at the text boundary of the document model.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Input text is not well-formed JSON.
    #[error("invalid document json: {0}")]
    Parse(#[source] serde_json::Error),

    /// A tree could not be written back out as JSON.
    #[error("failed to render document json: {0}")]
    Render(#[source] serde_json::Error),
}
