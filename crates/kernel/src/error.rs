//! Content error types.

use thiserror::Error;

/// Errors raised while decoding CMS payloads or mapping entries.
///
/// Rendering itself never fails; these only come from the input side.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The payload was not valid JSON or did not have the expected shape.
    #[error("malformed content payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A required entry field was absent or null.
    #[error("entry is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Result type alias using ContentError.
pub type ContentResult<T> = Result<T, ContentError>;
