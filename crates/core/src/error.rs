// crates/core/src/error.rs
use thiserror::Error;

/// Errors a document handler can raise during processing.
///
/// The runner translates any of these into terminal `failed` state with an
/// `{error}` result payload; they never escape to the caller as exceptions.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("document content is malformed: {0}")]
    MalformedContent(String),

    #[error("processing failed: {0}")]
    Failed(String),
}
