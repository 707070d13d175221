//! Static description of the `weather_readings` table
//!
//! Some channels are stored as fixed-point decimals with a known precision
//! and scale. Values are rounded to the scale before writing; the migration
//! enforces the magnitude with CHECK constraints that mirror this table.

/// Table holding all readings
pub const READINGS_TABLE: &str = "weather_readings";

/// Decimal precision of a bounded column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPrecision {
    pub column: &'static str,
    /// Total significant digits
    pub precision: u32,
    /// Digits after the decimal point
    pub scale: u32,
}

impl ColumnPrecision {
    const fn new(column: &'static str, precision: u32, scale: u32) -> Self {
        Self {
            column,
            precision,
            scale,
        }
    }

    /// Exclusive upper bound on the absolute value, `10^(precision - scale)`
    #[must_use]
    pub fn magnitude_limit(&self) -> f64 {
        10f64.powi(i32::try_from(self.precision - self.scale).unwrap_or(i32::MAX))
    }

    /// Round a value to the column scale
    #[must_use]
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(i32::try_from(self.scale).unwrap_or(0));
        (value * factor).round() / factor
    }

    /// Whether a rounded value fits the column
    #[must_use]
    pub fn fits(&self, value: f64) -> bool {
        self.round(value).abs() < self.magnitude_limit()
    }
}

pub const OUTDOOR_TEMPERATURE: ColumnPrecision = ColumnPrecision::new("outdoor_temperature", 5, 2);
pub const INDOOR_TEMPERATURE: ColumnPrecision = ColumnPrecision::new("indoor_temperature", 5, 2);
pub const OUTDOOR_HUMIDITY: ColumnPrecision = ColumnPrecision::new("outdoor_humidity", 5, 2);
pub const INDOOR_HUMIDITY: ColumnPrecision = ColumnPrecision::new("indoor_humidity", 5, 2);
pub const BAROMETRIC_PRESSURE: ColumnPrecision = ColumnPrecision::new("barometric_pressure", 7, 2);
pub const WIND_SPEED: ColumnPrecision = ColumnPrecision::new("wind_speed", 5, 2);
pub const WIND_GUST: ColumnPrecision = ColumnPrecision::new("wind_gust", 5, 2);
pub const RAIN_RATE: ColumnPrecision = ColumnPrecision::new("rain_rate", 6, 2);
pub const SOLAR_RADIATION: ColumnPrecision = ColumnPrecision::new("solar_radiation", 7, 2);

/// Every precision-bound column
pub const BOUNDED_COLUMNS: &[ColumnPrecision] = &[
    OUTDOOR_TEMPERATURE,
    INDOOR_TEMPERATURE,
    OUTDOOR_HUMIDITY,
    INDOOR_HUMIDITY,
    BAROMETRIC_PRESSURE,
    WIND_SPEED,
    WIND_GUST,
    RAIN_RATE,
    SOLAR_RADIATION,
];

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const MIGRATION: &str =
        include_str!("../../../../migrations/20240101000000_create_weather_readings.sql");

    #[test]
    fn rounding_to_two_decimals() {
        assert_eq!(OUTDOOR_TEMPERATURE.round(21.456), 21.46);
        assert_eq!(OUTDOOR_TEMPERATURE.round(-3.333), -3.33);
        assert_eq!(BAROMETRIC_PRESSURE.round(1013.2078), 1013.21);
    }

    #[test]
    fn magnitude_limits() {
        assert_eq!(OUTDOOR_TEMPERATURE.magnitude_limit(), 1000.0);
        assert_eq!(RAIN_RATE.magnitude_limit(), 10_000.0);
        assert_eq!(SOLAR_RADIATION.magnitude_limit(), 100_000.0);
    }

    #[test]
    fn fits_checks_rounded_value() {
        assert!(OUTDOOR_TEMPERATURE.fits(999.99));
        assert!(!OUTDOOR_TEMPERATURE.fits(999.999));
        assert!(!WIND_SPEED.fits(-1000.0));
    }

    #[test]
    fn migration_checks_match_precision_table() {
        for column in BOUNDED_COLUMNS {
            let limit = format!("{:.0}", column.magnitude_limit());
            let check = format!("CHECK (ABS({}) < {limit})", column.column);
            assert!(
                MIGRATION.contains(&check),
                "migration is missing `{check}`"
            );
        }
    }

    #[test]
    fn migration_creates_readings_table() {
        assert!(MIGRATION.contains(&format!("CREATE TABLE IF NOT EXISTS {READINGS_TABLE}")));
    }
}
