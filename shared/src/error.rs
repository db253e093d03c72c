//! Crate-wide error taxonomy.
//!
//! The teacher crate (`graph`) propagates `Result<T, String>` everywhere;
//! we keep the same "operations return a result-or-error pair, errors are
//! never used for control flow across module boundaries" discipline but
//! give callers a matchable taxonomy instead of an opaque string, per the
//! error kinds enumerated for this core.

use thiserror::Error;

/// Crate-wide error type. Each variant corresponds to one of the error
/// kinds of the taxonomy; the string payload is a human-readable detail,
/// never meant to be parsed back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("type error: {0}")]
    TypeError(String),

    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Error::TypeError(message.into())
    }

    pub fn assertion_failed(message: impl Into<String>) -> Self {
        Error::AssertionFailed(message.into())
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Error::AlreadyExists(message.into())
    }
}

/// Result alias used pervasively across the workspace, mirroring
/// `shared::types::Result` in the teacher crate.
pub type Result<T> = std::result::Result<T, Error>;
