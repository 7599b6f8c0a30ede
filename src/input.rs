//! Classification of stdin lines for the `canonlog` binary.

use serde_json::Value;

use crate::enhance;
use crate::fields;
use crate::level::Level;
use crate::record::LogRecord;
use crate::timestamp::Timestamp;

/// A non-empty input line.
#[derive(Debug, PartialEq)]
pub enum Line {
    /// The line is JSON. Not necessarily an object; `write` decides.
    Json(Value),
    /// The line is plain text, wrapped into a bunyan-shaped record
    /// (`time`, `level`, `msg`) ready for ALTER.
    Text(LogRecord),
}

/// Classify one line. Blank lines yield `None`.
///
/// A correlation id is attached to JSON objects that carry none, and folded
/// into the message of text lines.
pub fn parse_line(line: &str, correlation_id: Option<&str>) -> Option<Line> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(mut value) = serde_json::from_str::<Value>(trimmed) {
        if let (Value::Object(map), Some(id)) = (&mut value, correlation_id)
            && !map.contains_key(fields::CORRELATION_ID)
        {
            map.insert(fields::CORRELATION_ID.to_string(), Value::from(id));
        }
        return Some(Line::Json(value));
    }

    let mut record = LogRecord::new();
    record.insert(fields::TIME, Timestamp::now().to_canonical());
    record.insert(fields::LEVEL, Level::Info.value());
    record.insert(fields::MSG, enhance::enhance_text(line.trim_end(), correlation_id));
    Some(Line::Text(record))
}
