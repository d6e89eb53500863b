//! Error types for the todo schema and client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers routinely branch on
//! "the todo (or the whole table) is empty" versus "the server failed". The
//! service answers every error with a `{"message": ...}` body, so both
//! variants carry that text when the body could be read.

use thiserror::Error;

/// Request body failed the todo input schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task is required")]
    MissingTask,

    #[error("date must be YYYY-MM-DD or a midnight UTC timestamp, got {0:?}")]
    InvalidDate(String),
}

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: empty table, unknown id, or unknown route.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The server returned a non-success status other than 404.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
