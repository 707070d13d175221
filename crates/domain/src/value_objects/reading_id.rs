//! Reading identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Storage-assigned identifier of a persisted reading
///
/// Identifiers are positive and handed out by the store on insert; a reading
/// that has not been persisted has no identifier at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingId(i64);

impl ReadingId {
    /// Wrap an identifier returned by the store
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReadingId` for zero or negative values.
    pub const fn new(value: i64) -> Result<Self, DomainError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidReadingId(value))
        }
    }

    /// Get the raw identifier
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ReadingId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReadingId> for i64 {
    fn from(id: ReadingId) -> Self {
        id.0
    }
}
