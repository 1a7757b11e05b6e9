//! Runtime value types for field comparison.
//!
//! The [`Value`] enum is the value of a field extracted from a searched struct.
//! [`Number`] and [`Timestamp`] also know how to parse themselves from the
//! literal text found at the leaf of an operator-wrapped value.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{Result, ValopsError};

/// Runtime value for comparison, borrowed from the source struct.
///
/// # Example
///
/// ```
/// use valops::{Value, Number};
///
/// struct Employee {
///     user_name: String,
///     age: u8,
/// }
///
/// fn accessor<'a>(e: &'a Employee, field: &str) -> Value<'a> {
///     match field {
///         "userName" => Value::String(&e.user_name),
///         "age" => Value::Number(Number::U64(e.age as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Enum member name.
    Enum(&'a str),
    /// Field not present, null, or unsupported.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the enum member name, if present.
    pub fn as_enum(&self) -> Option<&'a str> {
        match self {
            Value::Enum(name) => Some(name),
            _ => None,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision.
/// Comparisons between different variants go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Parses the literal of a numeric comparison.
    ///
    /// Surrounding whitespace is ignored. Integers keep integer precision;
    /// anything else must be a finite float.
    pub fn parse(text: &str) -> Result<Number> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(Number::U64(n));
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Number::F64(n)),
            _ => Err(ValopsError::invalid_input(format!(
                "Invalid numeric value: '{}'",
                text
            ))),
        }
    }

    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            // Negative signed values are always below any unsigned value
            (Number::I64(a), Number::U64(_)) if a < 0 => Some(Ordering::Less),
            (Number::U64(_), Number::I64(b)) if b < 0 => Some(Ordering::Greater),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u8> for Number {
    fn from(n: u8) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Timestamp value represented as milliseconds since Unix epoch (UTC).
///
/// ```
/// use valops::Timestamp;
///
/// let day = Timestamp::parse("2020-01-10").unwrap();
/// assert!(Timestamp::parse("2020-01-01").unwrap() < day);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses a date or date-time literal.
    ///
    /// Accepted forms: `2020-01-10` (midnight UTC), `2020-01-10T08:30:00`
    /// with optional fractional seconds (UTC), and RFC 3339 with an offset.
    pub fn parse(text: &str) -> Result<Timestamp> {
        let text = text.trim();
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Timestamp(midnight.and_utc().timestamp_millis()));
            }
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Timestamp(dt.and_utc().timestamp_millis()));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Timestamp(dt.timestamp_millis()));
        }
        Err(ValopsError::invalid_input(format!(
            "Invalid date value: '{}'",
            text
        )))
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_extractors() {
        assert_eq!(Value::String("hello").as_str(), Some("hello"));
        assert_eq!(
            Value::Number(Number::I64(42)).as_number(),
            Some(Number::I64(42))
        );
        assert_eq!(
            Value::Timestamp(Timestamp(1000)).as_timestamp(),
            Some(Timestamp(1000))
        );
        assert_eq!(Value::Enum("ACTIVE").as_enum(), Some("ACTIVE"));
        assert!(Value::None.is_none());

        // Wrong type returns None
        assert_eq!(Value::String("test").as_number(), None);
        assert_eq!(Value::Enum("ACTIVE").as_str(), None);
    }

    #[test]
    fn number_parse() {
        assert_eq!(Number::parse("5").unwrap(), Number::I64(5));
        assert_eq!(Number::parse(" -12 ").unwrap(), Number::I64(-12));
        assert_eq!(
            Number::parse("18446744073709551615").unwrap(),
            Number::U64(u64::MAX)
        );
        assert_eq!(Number::parse("2.5").unwrap(), Number::F64(2.5));
        assert!(Number::parse("five").is_err());
        assert!(Number::parse("").is_err());
        assert!(Number::parse("NaN").is_err());
        assert!(Number::parse("inf").is_err());
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(5).compare(Number::U64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Number::U64(10).compare(Number::F64(5.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::I64(-1).compare(Number::U64(u64::MAX)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(0).compare(Number::I64(-1)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn number_nan_comparison() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn timestamp_parse_forms() {
        let day = Timestamp::parse("2020-01-10").unwrap();
        assert_eq!(day.as_millis(), 1_578_614_400_000);

        let dt = Timestamp::parse("2020-01-10T00:00:01").unwrap();
        assert_eq!(dt.as_millis(), day.as_millis() + 1000);

        let frac = Timestamp::parse("2020-01-10T00:00:00.250").unwrap();
        assert_eq!(frac.as_millis(), day.as_millis() + 250);

        let offset = Timestamp::parse("2020-01-10T01:00:00+01:00").unwrap();
        assert_eq!(offset, day);

        assert!(Timestamp::parse("10/01/2020").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn timestamp_display() {
        assert_eq!(
            Timestamp::parse("2020-01-10").unwrap().to_string(),
            "2020-01-10T00:00:00.000Z"
        );
    }
}
