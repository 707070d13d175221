//! Reading storage port
//!
//! Defines the append-only persistence contract for weather readings.

use async_trait::async_trait;
use domain::{ReadingId, StoredReading, WeatherReading};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather reading persistence
///
/// Readings are only ever appended; nothing in the application updates or
/// deletes a stored reading. Every method reports storage problems as
/// `ApplicationError::Storage`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadingStorePort: Send + Sync {
    /// Store a new reading as a single atomic write and return its identifier
    async fn append(&self, reading: &WeatherReading) -> Result<ReadingId, ApplicationError>;

    /// The reading with the greatest timestamp
    ///
    /// Readings sharing that timestamp are ordered by identifier, so the most
    /// recently inserted one wins.
    async fn latest(&self) -> Result<Option<StoredReading>, ApplicationError>;

    /// Total number of stored readings
    async fn count(&self) -> Result<u64, ApplicationError>;
}
