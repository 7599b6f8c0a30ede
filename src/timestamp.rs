//! Instants for the `@timestamp` field.
//!
//! Canonical records carry their timestamp as an RFC 3339 UTC string with
//! millisecond precision (`2026-01-15T10:30:00.123Z`). Legacy records may
//! carry a numeric Unix epoch instead; those are converted with a
//! magnitude-based heuristic.

use std::fmt;

/// Output format for canonical timestamps.
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A parsed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub value: jiff::Timestamp,
}

impl Timestamp {
    pub fn now() -> Self {
        Self {
            value: jiff::Timestamp::now(),
        }
    }

    /// Canonical string form.
    pub fn to_canonical(&self) -> String {
        let zdt = self.value.to_zoned(jiff::tz::TimeZone::UTC);
        zdt.strftime(CANONICAL_FORMAT).to_string()
    }

    /// Parse a timestamp from a [`serde_json::Value`].
    ///
    /// Supports RFC 3339 strings and Unix epochs in seconds, milliseconds or
    /// nanoseconds (integer) and fractional seconds (float).
    pub fn from_json_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => s.parse::<jiff::Timestamp>().ok().map(|value| Self { value }),
            serde_json::Value::Number(n) => Self::parse_number(n),
            _ => None,
        }
    }

    /// Parse a numeric timestamp using the heuristic:
    /// - Value < 1e12 → seconds
    /// - Value < 1e15 → milliseconds
    /// - Value ≥ 1e15 → nanoseconds
    fn parse_number(n: &serde_json::Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            Self::from_epoch_integer(i)
        } else {
            n.as_f64().and_then(Self::from_epoch_float)
        }
    }

    fn from_epoch_integer(value: i64) -> Option<Self> {
        let ts = if value < 1_000_000_000_000 {
            jiff::Timestamp::from_second(value).ok()?
        } else if value < 1_000_000_000_000_000 {
            jiff::Timestamp::from_millisecond(value).ok()?
        } else {
            jiff::Timestamp::from_nanosecond(i128::from(value)).ok()?
        };
        Some(Self { value: ts })
    }

    fn from_epoch_float(value: f64) -> Option<Self> {
        if value < 1e12 {
            #[allow(clippy::cast_possible_truncation)]
            let secs = value.trunc() as i64;
            #[allow(clippy::cast_possible_truncation)]
            let nanos = (value.fract() * 1_000_000_000.0) as i32;
            jiff::Timestamp::new(secs, nanos).ok().map(|value| Self { value })
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let ms = value as i64;
            jiff::Timestamp::from_millisecond(ms).ok().map(|value| Self { value })
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

/// Convert a legacy `time` value to its canonical form.
///
/// Numbers become canonical strings; every other value is kept verbatim,
/// including strings that do not parse.
pub fn canonicalize(value: serde_json::Value) -> serde_json::Value {
    match &value {
        serde_json::Value::Number(_) => match Timestamp::from_json_value(&value) {
            Some(ts) => serde_json::Value::String(ts.to_canonical()),
            None => value,
        },
        _ => value,
    }
}
