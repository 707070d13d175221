//! Station use cases
//!
//! Ingests webhook payloads and answers status/latest queries on top of a
//! `ReadingStorePort`. Every storage call is bounded by a timeout so a
//! stalled database surfaces as a storage failure instead of a hung request.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use domain::{ReadingId, StoredReading, WeatherReading};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::reading_normalizer;
use crate::error::ApplicationError;
use crate::form_fields::FormFields;
use crate::ports::ReadingStorePort;

/// Default bound on a single storage call in seconds
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Message returned when the store holds no readings yet
pub const NO_READINGS_MESSAGE: &str = "No weather readings found";

/// Snapshot of the service state for the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationStatus {
    /// Number of stored readings
    pub total_readings: u64,
    /// Timestamp of the most recent reading, if any
    pub last_reading_at: Option<DateTime<Utc>>,
    /// Time since the service started
    pub uptime: Duration,
}

impl StationStatus {
    /// Uptime rendered as `d.hh:mm:ss`
    #[must_use]
    pub fn uptime_display(&self) -> String {
        format_uptime(self.uptime)
    }
}

/// Render a duration as `d.hh:mm:ss`, dropping fractional seconds
#[must_use]
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{days}.{hours:02}:{minutes:02}:{seconds:02}")
}

/// Ingestion and query service for weather readings
pub struct StationService {
    store: Arc<dyn ReadingStorePort>,
    started_at: Instant,
    query_timeout: Duration,
}

impl std::fmt::Debug for StationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationService")
            .field("started_at", &self.started_at)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl StationService {
    /// Create a service with the default storage timeout
    pub fn new(store: Arc<dyn ReadingStorePort>) -> Self {
        Self {
            store,
            started_at: Instant::now(),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    /// Override the bound applied to each storage call
    #[must_use]
    pub const fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Override the instant uptime is measured from
    #[must_use]
    pub const fn with_started_at(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    /// Time since the service started
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Normalize a payload and persist it
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    pub async fn ingest(
        &self,
        fields: &FormFields,
    ) -> Result<(ReadingId, WeatherReading), ApplicationError> {
        let reading = reading_normalizer::normalize(fields);
        let id = self.bounded("append", self.store.append(&reading)).await?;
        info!(
            reading_id = %id,
            timestamp = %reading.timestamp,
            outdoor_temperature = reading.outdoor_temperature,
            "Stored weather reading"
        );
        Ok((id, reading))
    }

    /// Reading count, latest timestamp and uptime
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<StationStatus, ApplicationError> {
        let total_readings = self.bounded("count", self.store.count()).await?;
        let last_reading_at = self
            .bounded("latest", self.store.latest())
            .await?
            .map(|stored| stored.timestamp());

        Ok(StationStatus {
            total_readings,
            last_reading_at,
            uptime: self.uptime(),
        })
    }

    /// The most recent reading
    ///
    /// # Errors
    ///
    /// `NotFound` when the store is empty, `Storage` when it cannot be read.
    #[instrument(skip(self))]
    pub async fn latest_reading(&self) -> Result<StoredReading, ApplicationError> {
        match self.bounded("latest", self.store.latest()).await? {
            Some(stored) => Ok(stored),
            None => {
                debug!("Store holds no readings");
                Err(ApplicationError::NotFound(NO_READINGS_MESSAGE.to_string()))
            },
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        match timeout(self.query_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.query_timeout.as_millis(),
                    "Storage call timed out"
                );
                Err(ApplicationError::storage(format!(
                    "{operation} timed out after {}ms",
                    self.query_timeout.as_millis()
                )))
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;
    use mockall::predicate::always;

    use super::*;
    use crate::ports::MockReadingStorePort;

    fn service(mock: MockReadingStorePort) -> StationService {
        StationService::new(Arc::new(mock))
    }

    fn stored(id: i64, ts: DateTime<Utc>) -> StoredReading {
        StoredReading::new(ReadingId::new(id).unwrap(), WeatherReading::at(ts))
    }

    #[tokio::test]
    async fn ingest_normalizes_then_appends() {
        let mut mock = MockReadingStorePort::new();
        mock.expect_append()
            .withf(|reading| reading.outdoor_temperature == 0.0 && reading.model == "WS2900")
            .times(1)
            .returning(|_| Ok(ReadingId::new(7).unwrap()));

        let fields = FormFields::from_pairs([("tempf", "32"), ("model", "WS2900")]);
        let (id, reading) = service(mock).ingest(&fields).await.unwrap();

        assert_eq!(id.value(), 7);
        assert_eq!(reading.outdoor_temperature, 0.0);
    }

    #[tokio::test]
    async fn ingest_surfaces_storage_failure() {
        let mut mock = MockReadingStorePort::new();
        mock.expect_append()
            .with(always())
            .returning(|_| Err(ApplicationError::storage("disk full")));

        let err = service(mock)
            .ingest(&FormFields::default())
            .await
            .unwrap_err();
        assert!(err.is_storage_failure());
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn status_reports_count_and_latest_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut mock = MockReadingStorePort::new();
        mock.expect_count().returning(|| Ok(3));
        mock.expect_latest().returning(move || Ok(Some(stored(3, ts))));

        let status = service(mock).status().await.unwrap();
        assert_eq!(status.total_readings, 3);
        assert_eq!(status.last_reading_at, Some(ts));
    }

    #[tokio::test]
    async fn status_on_empty_store() {
        let mut mock = MockReadingStorePort::new();
        mock.expect_count().returning(|| Ok(0));
        mock.expect_latest().returning(|| Ok(None));

        let status = service(mock).status().await.unwrap();
        assert_eq!(status.total_readings, 0);
        assert!(status.last_reading_at.is_none());
    }

    #[tokio::test]
    async fn status_storage_failure_is_not_a_panic() {
        let mut mock = MockReadingStorePort::new();
        mock.expect_count()
            .returning(|| Err(ApplicationError::storage("unreachable")));

        let err = service(mock).status().await.unwrap_err();
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn status_uptime_counts_from_start() {
        let mut mock = MockReadingStorePort::new();
        mock.expect_count().returning(|| Ok(0));
        mock.expect_latest().returning(|| Ok(None));

        let started_at = Instant::now()
            .checked_sub(Duration::from_secs(90))
            .unwrap();
        let status = service(mock)
            .with_started_at(started_at)
            .status()
            .await
            .unwrap();
        assert!(status.uptime >= Duration::from_secs(90));
    }

    #[tokio::test]
    async fn latest_reading_returns_stored_record() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 2, 8, 0, 0).unwrap();
        let mut mock = MockReadingStorePort::new();
        mock.expect_latest().returning(move || Ok(Some(stored(11, ts))));

        let latest = service(mock).latest_reading().await.unwrap();
        assert_eq!(latest.id.value(), 11);
        assert_eq!(latest.timestamp(), ts);
    }

    #[tokio::test]
    async fn latest_reading_on_empty_store_is_not_found() {
        let mut mock = MockReadingStorePort::new();
        mock.expect_latest().returning(|| Ok(None));

        let err = service(mock).latest_reading().await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(ref msg) if msg == NO_READINGS_MESSAGE));
    }

    struct StalledStore;

    #[async_trait::async_trait]
    impl ReadingStorePort for StalledStore {
        async fn append(&self, _reading: &WeatherReading) -> Result<ReadingId, ApplicationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ReadingId::new(1).unwrap())
        }

        async fn latest(&self) -> Result<Option<StoredReading>, ApplicationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn count(&self) -> Result<u64, ApplicationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(0)
        }
    }

    #[tokio::test]
    async fn stalled_store_times_out_as_storage_failure() {
        let service = StationService::new(Arc::new(StalledStore))
            .with_query_timeout(Duration::from_millis(20));

        let err = service.latest_reading().await.unwrap_err();
        assert!(err.is_storage_failure());
        assert!(err.to_string().contains("timed out"));

        let err = service
            .ingest(&FormFields::default())
            .await
            .unwrap_err();
        assert!(err.is_storage_failure());
    }

    #[test]
    fn uptime_format() {
        assert_eq!(format_uptime(Duration::ZERO), "0.00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(59)), "0.00:00:59");
        assert_eq!(format_uptime(Duration::from_secs(3_661)), "0.01:01:01");
        assert_eq!(
            format_uptime(Duration::from_secs(2 * 86_400 + 5 * 3_600 + 7)),
            "2.05:00:07"
        );
        assert_eq!(format_uptime(Duration::from_millis(1_999)), "0.00:00:01");
    }

    #[test]
    fn status_uptime_display() {
        let status = StationStatus {
            total_readings: 0,
            last_reading_at: None,
            uptime: Duration::from_secs(86_400),
        };
        assert_eq!(status.uptime_display(), "1.00:00:00");
    }
}
