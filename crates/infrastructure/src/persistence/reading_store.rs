//! Weather reading store using sqlx
//!
//! Append-only SQLite persistence for normalized readings. Each append is a
//! single-row `INSERT`, so a reading is either stored whole or not at all.

use application::{error::ApplicationError, form_fields::SUPPORTED_YEARS, ports::ReadingStorePort};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use domain::{ReadingId, StoredReading, WeatherReading};
use sqlx::SqlitePool;
use tracing::{debug, instrument, warn};

use super::error::map_sqlx_error;
use super::schema::{self, ColumnPrecision};

const INSERT_READING: &str = r"
    INSERT INTO weather_readings (
        timestamp,
        outdoor_temperature, indoor_temperature, sensor1_temperature, sensor2_temperature,
        outdoor_humidity, indoor_humidity, sensor1_humidity, sensor2_humidity,
        barometric_pressure, absolute_pressure,
        wind_speed, wind_gust, wind_direction, max_daily_gust,
        rain_rate, event_rain, hourly_rain, daily_rain,
        weekly_rain, monthly_rain, yearly_rain, total_rain,
        solar_radiation, uv_index,
        wh65_battery, wh25_battery, battery1, battery2,
        station_type, frequency, model
    )
    VALUES (
        $1,
        $2, $3, $4, $5,
        $6, $7, $8, $9,
        $10, $11,
        $12, $13, $14, $15,
        $16, $17, $18, $19,
        $20, $21, $22, $23,
        $24, $25,
        $26, $27, $28, $29,
        $30, $31, $32
    )
";

const SELECT_LATEST: &str = r"
    SELECT * FROM weather_readings
    ORDER BY timestamp DESC, id DESC
    LIMIT 1
";

/// Row shape of `weather_readings`
#[derive(Debug, sqlx::FromRow)]
struct ReadingRow {
    id: i64,
    timestamp: String,
    outdoor_temperature: f64,
    indoor_temperature: f64,
    sensor1_temperature: Option<f64>,
    sensor2_temperature: Option<f64>,
    outdoor_humidity: f64,
    indoor_humidity: f64,
    sensor1_humidity: Option<f64>,
    sensor2_humidity: Option<f64>,
    barometric_pressure: f64,
    absolute_pressure: f64,
    wind_speed: f64,
    wind_gust: f64,
    wind_direction: f64,
    max_daily_gust: f64,
    rain_rate: f64,
    event_rain: f64,
    hourly_rain: f64,
    daily_rain: f64,
    weekly_rain: f64,
    monthly_rain: f64,
    yearly_rain: f64,
    total_rain: f64,
    solar_radiation: f64,
    uv_index: f64,
    wh65_battery: i64,
    wh25_battery: i64,
    battery1: i64,
    battery2: i64,
    station_type: String,
    frequency: String,
    model: String,
}

impl TryFrom<ReadingRow> for StoredReading {
    type Error = ApplicationError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        let id = stored_id(row.id)?;
        let reading = WeatherReading {
            timestamp: parse_datetime(&row.timestamp)?,
            outdoor_temperature: row.outdoor_temperature,
            indoor_temperature: row.indoor_temperature,
            sensor1_temperature: row.sensor1_temperature,
            sensor2_temperature: row.sensor2_temperature,
            outdoor_humidity: row.outdoor_humidity,
            indoor_humidity: row.indoor_humidity,
            sensor1_humidity: row.sensor1_humidity,
            sensor2_humidity: row.sensor2_humidity,
            barometric_pressure: row.barometric_pressure,
            absolute_pressure: row.absolute_pressure,
            wind_speed: row.wind_speed,
            wind_gust: row.wind_gust,
            wind_direction: row.wind_direction,
            max_daily_gust: row.max_daily_gust,
            rain_rate: row.rain_rate,
            event_rain: row.event_rain,
            hourly_rain: row.hourly_rain,
            daily_rain: row.daily_rain,
            weekly_rain: row.weekly_rain,
            monthly_rain: row.monthly_rain,
            yearly_rain: row.yearly_rain,
            total_rain: row.total_rain,
            solar_radiation: row.solar_radiation,
            uv_index: row.uv_index,
            wh65_battery: parse_battery("wh65_battery", row.wh65_battery)?,
            wh25_battery: parse_battery("wh25_battery", row.wh25_battery)?,
            battery1: parse_battery("battery1", row.battery1)?,
            battery2: parse_battery("battery2", row.battery2)?,
            station_type: row.station_type,
            frequency: row.frequency,
            model: row.model,
        };
        Ok(Self::new(id, reading))
    }
}

/// Format a timestamp the way it is stored: RFC 3339, whole seconds, `Z`
fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a timestamp for writing, refusing years whose text would not
/// parse back or sort chronologically
fn storable_datetime(ts: DateTime<Utc>) -> Result<String, ApplicationError> {
    if SUPPORTED_YEARS.contains(&ts.year()) {
        Ok(format_datetime(ts))
    } else {
        Err(ApplicationError::storage(format!(
            "Timestamp {ts} is outside the storable year range"
        )))
    }
}

/// A row id that is not a valid reading id means the table is corrupt
fn stored_id(value: i64) -> Result<ReadingId, ApplicationError> {
    ReadingId::new(value)
        .map_err(|e| ApplicationError::storage(format!("Invalid stored row id: {e}")))
}

/// Parse a stored RFC 3339 timestamp
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, ApplicationError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApplicationError::storage(format!("Invalid stored timestamp '{s}': {e}")))
}

fn parse_battery(column: &str, value: i64) -> Result<i32, ApplicationError> {
    i32::try_from(value)
        .map_err(|_| ApplicationError::storage(format!("{column} out of range: {value}")))
}

/// Round a bounded value and reject it when it cannot fit the column
fn bounded(column: ColumnPrecision, value: f64) -> Result<f64, ApplicationError> {
    if !column.fits(value) {
        warn!(
            column = column.column,
            value,
            precision = column.precision,
            scale = column.scale,
            "Value exceeds column precision"
        );
        return Err(ApplicationError::storage(format!(
            "{} value {value} exceeds precision ({}, {})",
            column.column, column.precision, column.scale
        )));
    }
    Ok(column.round(value))
}

/// SQLite-backed reading store
#[derive(Debug, Clone)]
pub struct SqliteReadingStore {
    pool: SqlitePool,
}

impl SqliteReadingStore {
    /// Create a store on an already-migrated pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStorePort for SqliteReadingStore {
    #[instrument(skip(self, reading), fields(timestamp = %reading.timestamp))]
    async fn append(&self, reading: &WeatherReading) -> Result<ReadingId, ApplicationError> {
        let result = sqlx::query(INSERT_READING)
            .bind(storable_datetime(reading.timestamp)?)
            .bind(bounded(schema::OUTDOOR_TEMPERATURE, reading.outdoor_temperature)?)
            .bind(bounded(schema::INDOOR_TEMPERATURE, reading.indoor_temperature)?)
            .bind(reading.sensor1_temperature)
            .bind(reading.sensor2_temperature)
            .bind(bounded(schema::OUTDOOR_HUMIDITY, reading.outdoor_humidity)?)
            .bind(bounded(schema::INDOOR_HUMIDITY, reading.indoor_humidity)?)
            .bind(reading.sensor1_humidity)
            .bind(reading.sensor2_humidity)
            .bind(bounded(schema::BAROMETRIC_PRESSURE, reading.barometric_pressure)?)
            .bind(reading.absolute_pressure)
            .bind(bounded(schema::WIND_SPEED, reading.wind_speed)?)
            .bind(bounded(schema::WIND_GUST, reading.wind_gust)?)
            .bind(reading.wind_direction)
            .bind(reading.max_daily_gust)
            .bind(bounded(schema::RAIN_RATE, reading.rain_rate)?)
            .bind(reading.event_rain)
            .bind(reading.hourly_rain)
            .bind(reading.daily_rain)
            .bind(reading.weekly_rain)
            .bind(reading.monthly_rain)
            .bind(reading.yearly_rain)
            .bind(reading.total_rain)
            .bind(bounded(schema::SOLAR_RADIATION, reading.solar_radiation)?)
            .bind(reading.uv_index)
            .bind(reading.wh65_battery)
            .bind(reading.wh25_battery)
            .bind(reading.battery1)
            .bind(reading.battery2)
            .bind(&reading.station_type)
            .bind(&reading.frequency)
            .bind(&reading.model)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let id = stored_id(result.last_insert_rowid())?;
        debug!(reading_id = %id, "Reading inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn latest(&self) -> Result<Option<StoredReading>, ApplicationError> {
        let row: Option<ReadingRow> = sqlx::query_as(SELECT_LATEST)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(StoredReading::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, ApplicationError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather_readings")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        u64::try_from(count)
            .map_err(|_| ApplicationError::storage(format!("Invalid row count: {count}")))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::persistence::AsyncDatabase;

    async fn store() -> SqliteReadingStore {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        SqliteReadingStore::new(db.pool().clone())
    }

    fn reading_at(hour: u32) -> WeatherReading {
        WeatherReading::at(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
    }

    #[test]
    fn timestamps_are_stored_with_second_precision() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_datetime(ts), "2024-01-01T12:00:00Z");
        assert_eq!(parse_datetime("2024-01-01T12:00:00Z").unwrap(), ts);
    }

    #[test]
    fn timestamps_outside_supported_years_are_not_storable() {
        let negative = Utc.with_ymd_and_hms(-1, 6, 1, 12, 0, 0).unwrap();
        let zero = Utc.with_ymd_and_hms(0, 6, 1, 12, 0, 0).unwrap();
        assert!(storable_datetime(negative).unwrap_err().is_storage_failure());
        assert!(storable_datetime(zero).is_err());
        assert_eq!(
            storable_datetime(Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap()).unwrap(),
            "0001-01-01T00:00:00Z"
        );
    }

    #[test]
    fn non_positive_row_id_is_storage_failure() {
        assert!(stored_id(0).unwrap_err().is_storage_failure());
        assert_eq!(stored_id(4).unwrap().value(), 4);
    }

    #[tokio::test]
    async fn negative_year_append_leaves_store_readable() {
        let store = store().await;
        store.append(&reading_at(1)).await.unwrap();

        let reading = WeatherReading::at(Utc.with_ymd_and_hms(-1, 6, 1, 12, 0, 0).unwrap());
        assert!(store.append(&reading).await.unwrap_err().is_storage_failure());

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.latest().await.unwrap().unwrap().reading, reading_at(1));
    }

    #[test]
    fn invalid_stored_timestamp_is_storage_failure() {
        assert!(parse_datetime("yesterday").unwrap_err().is_storage_failure());
    }

    #[test]
    fn battery_out_of_range_is_rejected() {
        assert_eq!(parse_battery("battery1", 1).unwrap(), 1);
        assert!(parse_battery("battery1", i64::MAX).is_err());
    }

    #[tokio::test]
    async fn bounded_values_are_rounded() {
        let store = store().await;
        let mut reading = reading_at(1);
        reading.outdoor_temperature = 21.456_789;
        reading.barometric_pressure = 1013.207_8;
        store.append(&reading).await.unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.reading.outdoor_temperature, 21.46);
        assert_eq!(latest.reading.barometric_pressure, 1013.21);
    }

    #[tokio::test]
    async fn out_of_precision_value_is_rejected_without_writing() {
        let store = store().await;
        let mut reading = reading_at(1);
        reading.wind_speed = 1500.0;

        let err = store.append(&reading).await.unwrap_err();
        assert!(err.is_storage_failure());
        assert!(err.to_string().contains("wind_speed"));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn check_constraint_rejects_raw_insert() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO weather_readings (timestamp, outdoor_temperature, indoor_temperature, \
             outdoor_humidity, indoor_humidity, barometric_pressure, absolute_pressure, \
             wind_speed, wind_gust, wind_direction, max_daily_gust, rain_rate, event_rain, \
             hourly_rain, daily_rain, weekly_rain, monthly_rain, yearly_rain, total_rain, \
             solar_radiation, uv_index, wh65_battery, wh25_battery, battery1, battery2, \
             station_type, frequency, model) \
             VALUES ('2024-01-01T00:00:00Z', 1000, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, \
             0, 0, 0, 0, 0, 0, 0, 0, 0, 0, '', '', '')",
        )
        .execute(db.pool())
        .await
        .map_err(map_sqlx_error);

        assert!(result.unwrap_err().is_storage_failure());
    }

    #[tokio::test]
    async fn optional_sensors_round_trip_as_absent() {
        let store = store().await;
        let mut reading = reading_at(1);
        reading.sensor1_temperature = Some(18.5);
        store.append(&reading).await.unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.reading.sensor1_temperature, Some(18.5));
        assert_eq!(latest.reading.sensor2_temperature, None);
        assert_eq!(latest.reading.sensor1_humidity, None);
    }
}
