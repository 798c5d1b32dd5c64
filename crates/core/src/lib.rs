//! Shared primitives for all Rust crates in Staybook.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Staybook crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
///
/// Store adapters translate their native failures into these kinds so that
/// callers can react without matching on backend error text.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource or relation does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write referenced a parent row that does not exist.
    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is known but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Transient store failure (connection loss, timeout, cancellation).
    #[error("transient store error: {0}")]
    Transient(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
