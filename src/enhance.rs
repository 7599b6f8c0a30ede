//! Message construction with an explicit correlation context.
//!
//! Callers that track a request's correlation id pass it here instead of the
//! core looking it up. The result is a `msg` string; when a correlation id is
//! given it is a JSON object carrying `correlation-id`, which
//! [`Mode::Alter`](crate::Mode::Alter) lifts back onto the record.

use serde_json::{Map, Value};

use crate::fields;

/// Objects with more keys than this are replaced by [`OVERSIZED_OBJECT`].
pub const MAX_OBJECT_KEYS: usize = 15;

pub const OVERSIZED_OBJECT: &str = "[object with more than 15 keys]";

/// Build a message from plain text.
pub fn enhance_text(message: &str, correlation_id: Option<&str>) -> String {
    match correlation_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let mut wrapped = Map::new();
            wrapped.insert(fields::CORRELATION_ID.to_string(), Value::from(id));
            wrapped.insert(fields::MSG.to_string(), Value::from(message));
            Value::Object(wrapped).to_string()
        }
        None => message.to_string(),
    }
}

/// Build a message from a structured payload.
///
/// The correlation id is added to the payload before the size check.
pub fn enhance_object(mut message: Map<String, Value>, correlation_id: Option<&str>) -> String {
    if let Some(id) = correlation_id.filter(|id| !id.is_empty()) {
        message.insert(fields::CORRELATION_ID.to_string(), Value::from(id));
    }
    if message.len() > MAX_OBJECT_KEYS {
        return OVERSIZED_OBJECT.to_string();
    }
    Value::Object(message).to_string()
}
