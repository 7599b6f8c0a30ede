//! Console renderings of canonical records.
//!
//! Two shapes, both newline-terminated and colorized by severity:
//! - text: `INFO @ 2026-01-15T10:30:00.123Z : message`
//! - compact JSON: the whole record on one line
//!
//! Severity is [`LogRecord::severity`]: a readable `level` first, then
//! `loglevel_value`.

use std::fmt::Write;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::fields;
use crate::level;
use crate::record::{LogRecord, is_present_value};

/// Console rendering choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// One human-readable line per record.
    #[default]
    Text,
    /// One compact JSON object per record.
    Json,
}

impl ConsoleFormat {
    pub fn render(self, record: &LogRecord, use_color: bool) -> String {
        match self {
            Self::Text => render_text(record, use_color),
            Self::Json => render_json(record, use_color),
        }
    }
}

/// `"<SEVERITY> @ <timestamp> : <message>\n"`.
///
/// The message is `msg`, or the compact form of `msg_json` when `msg` is
/// absent. A missing timestamp renders as `-`.
pub fn render_text(record: &LogRecord, use_color: bool) -> String {
    let severity = record.severity();
    let name = severity.map_or(level::UNKNOWN, level::name_of);

    let mut line = String::with_capacity(96);
    let _ = write!(line, "{name} @ ");
    match record.get(fields::TIMESTAMP) {
        Some(ts) if is_present_value(ts) => push_value(&mut line, ts),
        _ => line.push('-'),
    }
    line.push_str(" : ");
    match (record.get(fields::MSG), record.get(fields::MSG_JSON)) {
        (Some(msg), _) if is_present_value(msg) => push_value(&mut line, msg),
        (_, Some(payload)) => line.push_str(&payload.to_string()),
        _ => {}
    }

    finish(line, severity, use_color)
}

/// The full record as compact JSON.
pub fn render_json(record: &LogRecord, use_color: bool) -> String {
    finish(record.to_json(), record.severity(), use_color)
}

fn finish(line: String, severity: Option<i64>, use_color: bool) -> String {
    if use_color {
        // Unknown and missing severities share the UNKNOWN style.
        let style = level::style_of(severity.unwrap_or_default());
        format!("{}\n", line.style(style))
    } else {
        let mut line = line;
        line.push('\n');
        line
    }
}

/// Strings unquoted, everything else as compact JSON.
fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}
