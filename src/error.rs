// src/error.rs
// Standardized error types for the tutor

use thiserror::Error;

/// Main error type for the tutor library
#[derive(Error, Debug)]
pub enum TutorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The LLM provider could not produce a reply (transport failure,
    /// non-success status, or a malformed body).
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience type alias for Result using TutorError
pub type Result<T> = std::result::Result<T, TutorError>;

impl TutorError {
    pub fn not_found(what: impl Into<String>) -> Self {
        TutorError::NotFound(what.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        TutorError::Upstream(msg.into())
    }

    /// True when the failure came from the LLM collaborator rather than from us.
    pub fn is_upstream(&self) -> bool {
        matches!(self, TutorError::Upstream(_) | TutorError::Http(_))
    }
}
