//! Error types for `canonlog`.
//!
//! Uses [`thiserror`] for ergonomic error derivation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in `canonlog`.
///
/// Only construction-time failures propagate out of the logging path;
/// [`InvalidRecordType`](Self::InvalidRecordType) is reported and swallowed
/// at the `write` boundary.
#[derive(Debug, Error)]
pub enum LogError {
    /// A payload that is not a mapping was handed to `write`.
    #[error("record must be a JSON object, got {0}")]
    InvalidRecordType(&'static str),

    /// The file destination could not be opened or created.
    #[error("cannot open log destination {}: {source}", path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The buffered sink needs a tokio runtime to arm its flush timer.
    #[error("buffered sink must be created inside a tokio runtime")]
    NoRuntime,

    /// Configuration error (invalid flag value, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),
}
