//! Station payload normalization
//!
//! Builds one metric `WeatherReading` from a decoded station payload. Every
//! field is an independent projection of the input: parse, convert where the
//! unit changes, then default. Required channels fall back to 0 when absent;
//! the auxiliary sensor channels stay `None`, since not every station has
//! sensors 1 and 2 attached.

use chrono::{DateTime, SubsecRound, Utc};
use domain::{WeatherReading, units};

use crate::form_fields::FormFields;

/// Payload keys used by the station firmware
pub mod keys {
    pub const DATE_UTC: &str = "dateutc";
    pub const STATION_TYPE: &str = "stationtype";
    pub const MODEL: &str = "model";
    pub const FREQUENCY: &str = "freq";

    pub const TEMP_OUTDOOR_F: &str = "tempf";
    pub const TEMP_INDOOR_F: &str = "tempinf";
    pub const TEMP_SENSOR1_F: &str = "temp1f";
    pub const TEMP_SENSOR2_F: &str = "temp2f";

    pub const HUMIDITY_OUTDOOR: &str = "humidity";
    pub const HUMIDITY_INDOOR: &str = "humidityin";
    pub const HUMIDITY_SENSOR1: &str = "humidity1";
    pub const HUMIDITY_SENSOR2: &str = "humidity2";

    pub const BAROM_REL_IN: &str = "baromrelin";
    pub const BAROM_ABS_IN: &str = "baromabsin";

    pub const WIND_SPEED_MPH: &str = "windspeedmph";
    pub const WIND_GUST_MPH: &str = "windgustmph";
    pub const MAX_DAILY_GUST_MPH: &str = "maxdailygust";
    pub const WIND_DIR: &str = "winddir";

    pub const RAIN_RATE_IN: &str = "rainratein";
    pub const RAIN_EVENT_IN: &str = "eventrainin";
    pub const RAIN_HOURLY_IN: &str = "hourlyrainin";
    pub const RAIN_DAILY_IN: &str = "dailyrainin";
    pub const RAIN_WEEKLY_IN: &str = "weeklyrainin";
    pub const RAIN_MONTHLY_IN: &str = "monthlyrainin";
    pub const RAIN_YEARLY_IN: &str = "yearlyrainin";
    pub const RAIN_TOTAL_IN: &str = "totalrainin";

    pub const SOLAR_RADIATION: &str = "solarradiation";
    pub const UV: &str = "uv";

    pub const BATTERY_WH65: &str = "wh65batt";
    pub const BATTERY_WH25: &str = "wh25batt";
    pub const BATTERY_1: &str = "batt1";
    pub const BATTERY_2: &str = "batt2";
}

/// Normalize a payload, using the current instant when `dateutc` is unusable
pub fn normalize(fields: &FormFields) -> WeatherReading {
    normalize_at(fields, Utc::now())
}

/// Normalize a payload with an explicit ingestion instant
///
/// `now` is used as the reading timestamp (truncated to whole seconds) when
/// the payload has no parseable `dateutc`.
pub fn normalize_at(fields: &FormFields, now: DateTime<Utc>) -> WeatherReading {
    let number = |key| fields.optional_number(key);
    // A finite input can still overflow once scaled
    let converted = |key, convert: fn(f64) -> f64| {
        number(key).map(convert).filter(|value| value.is_finite())
    };
    let celsius = |key| converted(key, units::fahrenheit_to_celsius);
    let hpa = |key| converted(key, units::inhg_to_hpa);
    let ms = |key| converted(key, units::mph_to_ms);
    let mm = |key| converted(key, units::inches_to_mm);
    let battery = |key| fields.optional_integer(key).unwrap_or(0);

    WeatherReading {
        timestamp: fields
            .timestamp(keys::DATE_UTC)
            .unwrap_or_else(|| now.trunc_subsecs(0)),

        outdoor_temperature: celsius(keys::TEMP_OUTDOOR_F).unwrap_or(0.0),
        indoor_temperature: celsius(keys::TEMP_INDOOR_F).unwrap_or(0.0),
        sensor1_temperature: celsius(keys::TEMP_SENSOR1_F),
        sensor2_temperature: celsius(keys::TEMP_SENSOR2_F),

        outdoor_humidity: number(keys::HUMIDITY_OUTDOOR).unwrap_or(0.0),
        indoor_humidity: number(keys::HUMIDITY_INDOOR).unwrap_or(0.0),
        sensor1_humidity: number(keys::HUMIDITY_SENSOR1),
        sensor2_humidity: number(keys::HUMIDITY_SENSOR2),

        barometric_pressure: hpa(keys::BAROM_REL_IN).unwrap_or(0.0),
        absolute_pressure: hpa(keys::BAROM_ABS_IN).unwrap_or(0.0),

        wind_speed: ms(keys::WIND_SPEED_MPH).unwrap_or(0.0),
        wind_gust: ms(keys::WIND_GUST_MPH).unwrap_or(0.0),
        wind_direction: number(keys::WIND_DIR).unwrap_or(0.0),
        max_daily_gust: ms(keys::MAX_DAILY_GUST_MPH).unwrap_or(0.0),

        rain_rate: mm(keys::RAIN_RATE_IN).unwrap_or(0.0),
        event_rain: mm(keys::RAIN_EVENT_IN).unwrap_or(0.0),
        hourly_rain: mm(keys::RAIN_HOURLY_IN).unwrap_or(0.0),
        daily_rain: mm(keys::RAIN_DAILY_IN).unwrap_or(0.0),
        weekly_rain: mm(keys::RAIN_WEEKLY_IN).unwrap_or(0.0),
        monthly_rain: mm(keys::RAIN_MONTHLY_IN).unwrap_or(0.0),
        yearly_rain: mm(keys::RAIN_YEARLY_IN).unwrap_or(0.0),
        total_rain: mm(keys::RAIN_TOTAL_IN).unwrap_or(0.0),

        solar_radiation: number(keys::SOLAR_RADIATION).unwrap_or(0.0),
        uv_index: number(keys::UV).unwrap_or(0.0),

        wh65_battery: battery(keys::BATTERY_WH65),
        wh25_battery: battery(keys::BATTERY_WH25),
        battery1: battery(keys::BATTERY_1),
        battery2: battery(keys::BATTERY_2),

        station_type: fields.text(keys::STATION_TYPE),
        frequency: fields.text(keys::FREQUENCY),
        model: fields.text(keys::MODEL),
    }
}
