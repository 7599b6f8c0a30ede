//! The [`LogRecord`] mapping and the presence rule shared by normalization.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LogError;
use crate::fields;
use crate::level;

/// One emitted event: an ordered mapping from field name to JSON value.
///
/// Records are built per call, moved through normalization by value and
/// dropped once serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(Map<String, Value>);

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a JSON value as a record. Only objects are records.
    pub fn from_value(value: Value) -> Result<Self, LogError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(LogError::InvalidRecordType(json_type_name(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether `key` holds a usable value.
    ///
    /// Missing keys, `null` and `""` are absent. `0` and `false` are present.
    pub fn is_present(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_present_value)
    }

    /// Insert `value` under `key` only when the key is absent.
    pub fn backfill(&mut self, key: &str, value: impl Into<Value>) {
        if !self.is_present(key) {
            self.0.insert(key.to_string(), value.into());
        }
    }

    /// Borrow a string field, if the field holds a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Numeric severity of the record.
    ///
    /// A readable legacy `level` wins (records written with
    /// [`Mode::None`](crate::Mode::None) still carry one), then
    /// `loglevel_value`.
    pub fn severity(&self) -> Option<i64> {
        self.0
            .get(fields::LEVEL)
            .and_then(level::severity_of)
            .or_else(|| self.0.get(fields::LOGLEVEL_VALUE).and_then(level::severity_of))
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> String {
        // A map of JSON values always serializes.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

/// Presence rule applied to a single value.
pub fn is_present_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for LogRecord {
    type Error = LogError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<LogRecord> for Value {
    fn from(record: LogRecord) -> Self {
        Self::Object(record.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for LogRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
