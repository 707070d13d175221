//! Weather reading entity
//!
//! One normalized, metric-unit snapshot of every sensor channel a station
//! reports. A `WeatherReading` is built per webhook call and becomes a
//! `StoredReading` once the store has assigned it an identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ReadingId;

/// A single station sample in metric units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// When the sample was taken (UTC, second precision)
    pub timestamp: DateTime<Utc>,

    // Temperature (°C)
    pub outdoor_temperature: f64,
    pub indoor_temperature: f64,
    pub sensor1_temperature: Option<f64>,
    pub sensor2_temperature: Option<f64>,

    // Relative humidity (%)
    pub outdoor_humidity: f64,
    pub indoor_humidity: f64,
    pub sensor1_humidity: Option<f64>,
    pub sensor2_humidity: Option<f64>,

    // Pressure (hPa)
    pub barometric_pressure: f64,
    pub absolute_pressure: f64,

    // Wind (m/s, direction in degrees)
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub wind_direction: f64,
    pub max_daily_gust: f64,

    // Rain (mm, rate in mm/h)
    pub rain_rate: f64,
    pub event_rain: f64,
    pub hourly_rain: f64,
    pub daily_rain: f64,
    pub weekly_rain: f64,
    pub monthly_rain: f64,
    pub yearly_rain: f64,
    pub total_rain: f64,

    // Solar (W/m²) and UV index
    pub solar_radiation: f64,
    pub uv_index: f64,

    // Battery status codes as reported by the sensors
    pub wh65_battery: i32,
    pub wh25_battery: i32,
    pub battery1: i32,
    pub battery2: i32,

    // Station identification
    pub station_type: String,
    pub frequency: String,
    pub model: String,
}

impl WeatherReading {
    /// Create an all-zero reading taken at the given instant
    ///
    /// Optional sensor channels start out absent and identification strings
    /// empty, matching what an empty payload normalizes to.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }
}

/// A reading that has been persisted and carries its storage identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReading {
    /// Identifier assigned by the store
    pub id: ReadingId,
    /// The persisted measurements
    #[serde(flatten)]
    pub reading: WeatherReading,
}

impl StoredReading {
    /// Pair a reading with the identifier the store assigned to it
    #[must_use]
    pub const fn new(id: ReadingId, reading: WeatherReading) -> Self {
        Self { id, reading }
    }

    /// Timestamp of the underlying reading
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.reading.timestamp
    }
}
