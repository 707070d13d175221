//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Identifier outside the range the store can assign
    #[error("Invalid reading id: {0}")]
    InvalidReadingId(i64),
}
