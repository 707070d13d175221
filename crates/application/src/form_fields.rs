//! Typed access to form-encoded station payloads
//!
//! Stations post every channel as an untyped `key=value` pair. `FormFields`
//! keeps the decoded pairs and coerces individual values on demand. Coercion
//! is best-effort: a missing or malformed value only affects its own field,
//! which comes back as `None` (or an empty string for text).

use std::{collections::HashMap, ops::RangeInclusive};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use tracing::debug;

/// Wall-clock layouts accepted for timestamps, tried in order
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Calendar years a station timestamp may carry
///
/// Keeps stored RFC 3339 text four-digit and unsigned, so it parses back and
/// sorts chronologically.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Decoded form payload with first-occurrence-wins key semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: HashMap<String, String>,
}

impl FormFields {
    /// Build from decoded `(key, value)` pairs
    ///
    /// When a key repeats, the first occurrence is kept.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { values }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the payload carried no fields at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Text field passed through verbatim; missing keys yield an empty string
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Decimal field, `None` when missing or not a finite decimal number
    pub fn optional_number(&self, name: &str) -> Option<f64> {
        let raw = self.get(name)?;
        let parsed = parse_number(raw);
        if parsed.is_none() {
            debug!(field = name, value = raw, "Ignoring unparsable number");
        }
        parsed
    }

    /// Whole-number field, `None` when missing or not an integer
    pub fn optional_integer(&self, name: &str) -> Option<i32> {
        let raw = self.get(name)?;
        let parsed = parse_integer(raw);
        if parsed.is_none() {
            debug!(field = name, value = raw, "Ignoring unparsable integer");
        }
        parsed
    }

    /// Date-time field interpreted as UTC, `None` when missing or unparsable
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        let raw = self.get(name)?;
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            debug!(field = name, value = raw, "Ignoring unparsable timestamp");
        }
        parsed
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Parse a locale-invariant decimal number
///
/// Accepts an optional sign, a period as decimal separator and an optional
/// exponent. Grouping characters, empty strings and non-finite results
/// (`NaN`, `inf`, overflow) are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim_ascii()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a whole number that fits in 32 bits
pub fn parse_integer(raw: &str) -> Option<i32> {
    raw.trim_ascii().parse::<i32>().ok()
}

/// Parse a station timestamp
///
/// Every `+` is treated as a space before parsing, since stations send the
/// date/time separator URL-encoded. The wall-clock value is labelled UTC even
/// if the string carries an offset, and is truncated to whole seconds.
/// Years outside [`SUPPORTED_YEARS`] are rejected.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw.replace('+', " ");
    let cleaned = cleaned.trim_ascii();
    if cleaned.is_empty() {
        return None;
    }

    let naive = DateTime::parse_from_rfc3339(cleaned)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(cleaned, format).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .filter(|naive| SUPPORTED_YEARS.contains(&naive.year()))?;

    Some(naive.and_utc().trunc_subsecs(0))
}
