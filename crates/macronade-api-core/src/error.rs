//! Error types for the project-file boundary.
//!
//! The reducer itself is infallible; errors only exist where external data
//! enters the core.

use thiserror::Error;

/// Why a project file was rejected. Rejection happens before any state
/// mutation, so the caller's in-memory state is always left untouched.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// A required field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A required field is present but has the wrong shape.
    #[error("field `{0}` must be an array")]
    NotAnArray(&'static str),

    /// The document is not valid JSON or does not match the schema.
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
}
