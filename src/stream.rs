//! The `write(record, mode)` ingress.
//!
//! Every accepted record is normalized, checked against the minimum
//! severity, echoed to the console (text or compact JSON), and, when a file
//! destination is configured, serialized and appended to the
//! [`BufferedSink`]. Payloads that are not JSON objects are
//! reported and dropped; nothing on this path panics or returns an error.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::{Config, Destination};
use crate::error::LogError;
use crate::identity::ProcessIdentity;
use crate::level::Level;
use crate::normalize::{Mode, Normalizer};
use crate::record::LogRecord;
use crate::render::ConsoleFormat;
use crate::sink::BufferedSink;

/// Console echo settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Echo {
    pub format: ConsoleFormat,
    pub use_color: bool,
}

/// Normalizer + console echo + optional buffered file sink.
pub struct LogStream {
    normalizer: Normalizer,
    echo: Option<Echo>,
    console: Mutex<Box<dyn Write + Send>>,
    sink: Option<BufferedSink>,
    min_level: Option<Level>,
    rejected: AtomicU64,
    suppressed: AtomicU64,
}

impl LogStream {
    /// Assemble a stream from its parts. `echo: None` disables the console.
    pub fn new(
        normalizer: Normalizer,
        echo: Option<Echo>,
        console: impl Write + Send + 'static,
        sink: Option<BufferedSink>,
    ) -> Self {
        Self {
            normalizer,
            echo,
            console: Mutex::new(Box::new(console)),
            sink,
            min_level: None,
            rejected: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Drop records whose severity is below `level`.
    #[must_use]
    pub fn with_min_level(mut self, level: Option<Level>) -> Self {
        self.min_level = level;
        self
    }

    /// Build the stream described by `config`, echoing to stdout.
    ///
    /// Fails with [`LogError::DestinationUnavailable`] when the file
    /// destination cannot be opened, and with [`LogError::NoRuntime`] outside
    /// a tokio runtime.
    pub fn from_config(config: &Config, use_color: bool) -> Result<Self, LogError> {
        let mut identity = ProcessIdentity::detect();
        if config.service_color.is_some() {
            identity = identity.with_service_color(config.service_color.clone());
        }
        let normalizer = Normalizer::new(identity, config.static_fields.clone());

        let sink = match &config.destination {
            Destination::Console => None,
            Destination::File(path) => Some(BufferedSink::open(path, config.flush)?),
        };

        let echo = config.echo.then_some(Echo {
            format: if config.console_json {
                ConsoleFormat::Json
            } else {
                ConsoleFormat::Text
            },
            use_color,
        });

        Ok(Self::new(normalizer, echo, io::stdout(), sink).with_min_level(config.min_level))
    }

    /// Log one record.
    ///
    /// A non-object payload emits a warning and is otherwise ignored.
    pub fn write(&self, payload: Value, mode: Mode) {
        match LogRecord::from_value(payload) {
            Ok(record) => self.write_record(record, mode),
            Err(e) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "dropping log payload");
            }
        }
    }

    /// Log one record that is already known to be a mapping.
    pub fn write_record(&self, record: LogRecord, mode: Mode) {
        let record = self.normalizer.normalize(record, mode);

        if self.is_suppressed(&record) {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            return;
        }

        if let Some(echo) = self.echo {
            let rendered = echo.format.render(&record, echo.use_color);
            let mut console = self.console.lock();
            if let Err(e) = console.write_all(rendered.as_bytes()) {
                tracing::debug!(error = %e, "console echo failed");
            }
        }

        if let Some(sink) = &self.sink {
            sink.append(record.to_json());
        }
    }

    /// Flush the console and drain the sink buffer.
    pub fn flush(&self) {
        if let Err(e) = self.console.lock().flush() {
            tracing::debug!(error = %e, "console flush failed");
        }
        if let Some(sink) = &self.sink {
            sink.flush();
        }
    }

    /// Final flush; releases the file destination.
    pub fn close(self) {
        if let Err(e) = self.console.lock().flush() {
            tracing::debug!(error = %e, "console flush failed");
        }
        if let Some(sink) = self.sink {
            sink.close();
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn sink(&self) -> Option<&BufferedSink> {
        self.sink.as_ref()
    }

    /// Payloads dropped because they were not JSON objects.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Records dropped by the minimum severity.
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// No severity, no verdict: such records pass.
    fn is_suppressed(&self, record: &LogRecord) -> bool {
        match (self.min_level, record.severity()) {
            (Some(min), Some(severity)) => severity < min.value(),
            _ => false,
        }
    }
}
