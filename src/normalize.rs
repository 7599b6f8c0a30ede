//! Record normalization into the canonical field schema.
//!
//! Three modes:
//! - [`Mode::None`] passes a record through untouched.
//! - [`Mode::Alter`] remaps a bunyan-shaped record (`time`, numeric `level`,
//!   `hostname`, `v`, `name`) into canonical fields, recovers JSON hidden in
//!   `msg`, and merges the static fields last.
//! - [`Mode::Adapt`] backfills canonical fields missing from an arbitrary
//!   object and never removes anything.
//!
//! "Absent" follows [`LogRecord::is_present`]: a missing key, `null` or `""`.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::fields::{self, defaults};
use crate::identity::ProcessIdentity;
use crate::level;
use crate::record::{LogRecord, is_present_value};
use crate::timestamp::{self, Timestamp};

/// How much rewriting a record gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The record is already canonical.
    None,
    /// The record comes from a logging framework and is remapped.
    #[default]
    Alter,
    /// The record is a plain object; missing canonical fields are filled in.
    Adapt,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Alter => "alter",
            Self::Adapt => "adapt",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "alter" => Ok(Self::Alter),
            "adapt" => Ok(Self::Adapt),
            _ => Err(format!(
                "invalid mode '{s}': expected one of none, alter, adapt"
            )),
        }
    }
}

/// Turns raw records into canonical ones.
///
/// Holds everything normalization reads besides the record itself, so the
/// core never consults process-global state.
#[derive(Debug, Clone)]
pub struct Normalizer {
    identity: ProcessIdentity,
    static_fields: Map<String, Value>,
}

impl Normalizer {
    pub fn new(identity: ProcessIdentity, static_fields: Map<String, Value>) -> Self {
        Self {
            identity,
            static_fields,
        }
    }

    pub fn identity(&self) -> &ProcessIdentity {
        &self.identity
    }

    pub fn static_fields(&self) -> &Map<String, Value> {
        &self.static_fields
    }

    /// Normalize `record` according to `mode`. Never fails.
    pub fn normalize(&self, record: LogRecord, mode: Mode) -> LogRecord {
        match mode {
            Mode::None => record,
            Mode::Alter => self.alter(record),
            Mode::Adapt => self.adapt(record),
        }
    }

    fn alter(&self, mut record: LogRecord) -> LogRecord {
        if let Some(time) = record.remove(fields::TIME)
            && is_present_value(&time)
        {
            record.insert(fields::TIMESTAMP, timestamp::canonicalize(time));
        }

        record.backfill(fields::HOST, self.identity.host.as_str());
        record.remove(fields::HOSTNAME);

        for key in fields::BOOKKEEPING {
            record.remove(key);
        }

        if let Some(color) = &self.identity.service_color {
            record.backfill(fields::CURRENT_COLOR, color.as_str());
        }

        if let Some(raw) = record.remove(fields::LEVEL)
            && !raw.is_null()
        {
            let (name, value) = split_level(raw);
            record.insert(fields::LOGLEVEL, name);
            record.insert(fields::LOGLEVEL_VALUE, value);
        }

        if let Some(payload) = record.get_str(fields::MSG).and_then(parse_json_message) {
            record.remove(fields::MSG);
            lift_identifying_fields(&mut record, payload);
        }

        for (key, value) in &self.static_fields {
            record.insert(key.as_str(), value.clone());
        }

        record
    }

    fn adapt(&self, mut record: LogRecord) -> LogRecord {
        if !record.is_present(fields::TIMESTAMP) {
            record.insert(fields::TIMESTAMP, Timestamp::now().to_canonical());
        }
        record.backfill(fields::HOST, self.identity.host.as_str());
        record.backfill(fields::PID, self.identity.pid);
        record.backfill(fields::LOGLEVEL, defaults::LOGLEVEL);
        record.backfill(fields::LOGLEVEL_VALUE, defaults::LOGLEVEL_VALUE);
        record.backfill(fields::LOG_TYPE, defaults::LOG_TYPE);
        record.backfill(fields::APPLICATION_TYPE, defaults::APPLICATION_TYPE);

        if let Some(service) = self
            .static_fields
            .get(fields::SERVICE)
            .filter(|v| is_present_value(v))
        {
            record.backfill(fields::SERVICE, service.clone());
        }

        if let Some(color) = &self.identity.service_color {
            record.backfill(fields::CURRENT_COLOR, color.as_str());
        }

        if !record.is_present(fields::MSG) && !record.is_present(fields::MSG_JSON) {
            record.insert(fields::MSG, defaults::EMPTY_MSG);
        }

        record
    }
}

/// Strictly parse a message as a JSON object.
///
/// Anything else, including valid JSON scalars and arrays, is plain text.
pub fn parse_json_message(msg: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(msg) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Split a legacy `level` into its canonical name and numeric value.
///
/// Numeric levels keep their original value; named levels take their band
/// number. Unrecognized values are `UNKNOWN` and kept as given.
fn split_level(raw: Value) -> (&'static str, Value) {
    match level::severity_of(&raw) {
        Some(n) if raw.is_string() => (level::name_of(n), Value::from(n)),
        Some(n) => (level::name_of(n), raw),
        None => (level::UNKNOWN, raw),
    }
}

/// Store a recovered message payload, first moving its `correlation-id` (and
/// then its `msg`) up to the outer record when the outer record has none.
///
/// A payload emptied by the move is dropped.
fn lift_identifying_fields(record: &mut LogRecord, mut payload: Map<String, Value>) {
    let mut lifted = false;

    if !record.is_present(fields::CORRELATION_ID)
        && payload
            .get(fields::CORRELATION_ID)
            .is_some_and(is_present_value)
        && let Some(correlation_id) = payload.remove(fields::CORRELATION_ID)
    {
        record.insert(fields::CORRELATION_ID, correlation_id);
        lifted = true;

        if payload.get(fields::MSG).is_some_and(is_present_value)
            && let Some(msg) = payload.remove(fields::MSG)
        {
            record.insert(fields::MSG, msg);
        }
    }

    if !(lifted && payload.is_empty()) {
        record.insert(fields::MSG_JSON, Value::Object(payload));
    }
}
