//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store was unreachable, timed out, or rejected the operation
    #[error("Storage failure: {0}")]
    Storage(String),

    /// Requested data does not exist (yet)
    #[error("{0}")]
    NotFound(String),
}

impl ApplicationError {
    /// Create a storage failure from any displayable cause
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        Self::Storage(cause.to_string())
    }

    /// Whether the error originates from the persistence layer
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
