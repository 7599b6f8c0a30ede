//! `canonlog`: canonical structured-log emission.
//!
//! Log records (JSON objects) are normalized into a fixed field schema,
//! echoed to the console as colorized text or compact JSON, and optionally
//! appended to an NDJSON file through a buffer that flushes on a record count
//! or after an idle timeout.
//!
//! # Example
//!
//! ```
//! use canonlog::{LogRecord, Mode, Normalizer, ProcessIdentity, render_text};
//! use serde_json::{Map, json};
//!
//! let identity = ProcessIdentity {
//!     host: "box-1".to_string(),
//!     pid: 7,
//!     service_color: None,
//! };
//! let normalizer = Normalizer::new(identity, Map::new());
//!
//! let raw = LogRecord::from_value(json!({
//!     "time": "2026-01-15T10:30:00.123Z",
//!     "level": 30,
//!     "msg": r#"{"correlation-id":"abc","msg":"hello"}"#,
//! }))
//! .unwrap();
//! let record = normalizer.normalize(raw, Mode::Alter);
//!
//! assert_eq!(record.get_str("correlation-id"), Some("abc"));
//! assert_eq!(
//!     render_text(&record, false),
//!     "INFO @ 2026-01-15T10:30:00.123Z : hello\n"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod enhance;
pub mod error;
pub mod fields;
pub mod identity;
pub mod input;
pub mod level;
pub mod normalize;
pub mod record;
pub mod render;
pub mod sink;
pub mod stream;
pub mod timestamp;

// Re-export primary API types for convenience.
pub use config::{Config, Destination};
pub use error::LogError;
pub use identity::ProcessIdentity;
pub use level::{Level, name_of, style_of};
pub use normalize::{Mode, Normalizer};
pub use record::LogRecord;
pub use render::{ConsoleFormat, render_json, render_text};
pub use sink::{BufferedSink, FlushPolicy, MemoryDestination, SinkStats};
pub use stream::{Echo, LogStream};
pub use timestamp::Timestamp;
