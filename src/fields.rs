//! Field names of the canonical record schema and of the legacy (bunyan-style)
//! shape it is remapped from.

/// Legacy timestamp field, renamed to [`TIMESTAMP`].
pub const TIME: &str = "time";
/// Canonical timestamp field.
pub const TIMESTAMP: &str = "@timestamp";

/// Legacy numeric level field, split into [`LOGLEVEL`] + [`LOGLEVEL_VALUE`].
pub const LEVEL: &str = "level";
/// Canonical severity name (`"INFO"`).
pub const LOGLEVEL: &str = "loglevel";
/// Canonical severity number (`30`).
pub const LOGLEVEL_VALUE: &str = "loglevel_value";

/// Human-readable message text.
pub const MSG: &str = "msg";
/// Structured payload recovered from a message that was itself JSON.
pub const MSG_JSON: &str = "msg_json";

/// Request-scoped identifier joining log lines of one operation.
pub const CORRELATION_ID: &str = "correlation-id";

pub const HOST: &str = "host";
/// Superseded by [`HOST`]; dropped on ALTER.
pub const HOSTNAME: &str = "hostname";
pub const PID: &str = "pid";
/// Deployment color tag of the emitting service.
pub const CURRENT_COLOR: &str = "current_color";

pub const LOG_TYPE: &str = "log_type";
pub const APPLICATION_TYPE: &str = "application_type";
pub const SERVICE: &str = "service";

/// Logging-framework bookkeeping (schema version, logger name), always dropped
/// on ALTER.
pub const BOOKKEEPING: &[&str] = &["v", "name"];

/// Backfill values used by ADAPT.
pub mod defaults {
    pub const LOGLEVEL: &str = "INFO";
    pub const LOGLEVEL_VALUE: i64 = 30;
    pub const LOG_TYPE: &str = "application";
    pub const APPLICATION_TYPE: &str = "service";
    pub const EMPTY_MSG: &str = "[empty]";
}
