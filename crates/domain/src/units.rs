//! Imperial to metric unit conversions
//!
//! Stations report in imperial units; everything the service stores is metric.
//! The conversions are total over finite inputs and know nothing about missing
//! values: callers carry absence in an `Option` and map through these.
//!
//! # Examples
//!
//! ```
//! use domain::units;
//!
//! assert_eq!(units::fahrenheit_to_celsius(212.0), 100.0);
//! assert_eq!(units::inches_to_mm(1.0), 25.4);
//!
//! // Absence stays absence
//! let missing: Option<f64> = None;
//! assert_eq!(missing.map(units::mph_to_ms), None);
//! ```

/// Hectopascals per inch of mercury
pub const HPA_PER_INHG: f64 = 33.8639;

/// Meters per second per mile per hour
pub const MS_PER_MPH: f64 = 0.44704;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert degrees Fahrenheit to degrees Celsius
#[must_use]
pub const fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert inches of mercury to hectopascals
#[must_use]
pub const fn inhg_to_hpa(inhg: f64) -> f64 {
    inhg * HPA_PER_INHG
}

/// Convert miles per hour to meters per second
#[must_use]
pub const fn mph_to_ms(mph: f64) -> f64 {
    mph * MS_PER_MPH
}

/// Convert inches to millimeters
#[must_use]
pub const fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn freezing_point_is_zero_celsius() {
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
    }

    #[test]
    fn boiling_point_is_hundred_celsius() {
        assert_eq!(fahrenheit_to_celsius(212.0), 100.0);
    }

    #[test]
    fn minus_forty_is_the_same_on_both_scales() {
        assert!((fahrenheit_to_celsius(-40.0) - -40.0).abs() < TOLERANCE);
    }

    #[test]
    fn fractional_fahrenheit_converts() {
        assert!((fahrenheit_to_celsius(70.7) - 21.5).abs() < TOLERANCE);
    }

    #[test]
    fn one_inch_is_25_4_mm() {
        assert_eq!(inches_to_mm(1.0), 25.4);
        assert_eq!(inches_to_mm(0.0), 0.0);
    }

    #[test]
    fn one_mph_in_meters_per_second() {
        assert!((mph_to_ms(1.0) - 0.44704).abs() < TOLERANCE);
        assert!((mph_to_ms(10.0) - 4.4704).abs() < TOLERANCE);
    }

    #[test]
    fn one_inhg_in_hectopascals() {
        assert!((inhg_to_hpa(1.0) - 33.8639).abs() < TOLERANCE);
    }

    #[test]
    fn standard_atmosphere_pressure() {
        // 29.92 inHg is roughly 1013.25 hPa
        assert!((inhg_to_hpa(29.92) - 1013.2).abs() < 0.1);
    }

    #[test]
    fn negative_inputs_stay_finite() {
        assert!(fahrenheit_to_celsius(-459.67).is_finite());
        assert!(inches_to_mm(-1.0).is_finite());
        assert!(mph_to_ms(-1.0).is_finite());
        assert!(inhg_to_hpa(-1.0).is_finite());
    }
}
