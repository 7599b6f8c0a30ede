//! Severity codec: numeric bands to canonical names and render styles.
//!
//! Records carry severity as a bunyan-style number (10 = trace … 60 = fatal).
//! The codec maps exact band values only; anything else is `UNKNOWN` and gets
//! its own style so it stands out on the console.

use std::fmt;

use owo_colors::Style;

/// Name used for any number outside the fixed bands.
pub const UNKNOWN: &str = "UNKNOWN";

/// Canonical log level enumeration.
///
/// Ordered by severity (ascending). Each discriminant is the numeric band
/// value written to `loglevel_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace = 10,
    Debug = 20,
    Info = 30,
    Warn = 40,
    Error = 50,
    Fatal = 60,
}

impl Level {
    /// All levels, ascending.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Canonical upper-case name written to `loglevel`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Numeric band value.
    pub const fn value(self) -> i64 {
        self as i64
    }

    /// Console style for this level.
    ///
    /// Fatal shares the error color and is set apart with bold.
    pub const fn style(self) -> Style {
        match self {
            Self::Trace => Style::new().white(),
            Self::Debug => Style::new().cyan(),
            Self::Info => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Fatal => Style::new().red().bold(),
        }
    }

    /// Exact band lookup. Values between bands do not round.
    pub const fn from_number(n: i64) -> Option<Self> {
        match n {
            10 => Some(Self::Trace),
            20 => Some(Self::Debug),
            30 => Some(Self::Info),
            40 => Some(Self::Warn),
            50 => Some(Self::Error),
            60 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Parse a string into a [`Level`], case-insensitive.
    ///
    /// Returns `None` for unrecognized strings.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" | "trc" => Some(Self::Trace),
            "debug" | "dbg" => Some(Self::Debug),
            "info" | "inf" | "information" => Some(Self::Info),
            "warn" | "warning" | "wrn" => Some(Self::Warn),
            "error" | "err" => Some(Self::Error),
            "fatal" | "critical" | "crit" | "panic" | "emerg" | "emergency" => Some(Self::Fatal),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical name for a numeric severity; `UNKNOWN` outside the bands.
pub fn name_of(n: i64) -> &'static str {
    Level::from_number(n).map_or(UNKNOWN, Level::name)
}

/// Console style for a numeric severity; blue outside the bands.
pub fn style_of(n: i64) -> Style {
    Level::from_number(n).map_or_else(|| Style::new().blue(), Level::style)
}

/// Read a severity number out of a JSON value.
///
/// Numbers are taken as-is (floats truncate toward zero); strings are matched
/// by name, so `"warn"` reads as 40. Anything else has no severity.
pub fn severity_of(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                #[allow(clippy::cast_possible_truncation)]
                n.as_f64().map(|f| f as i64)
            }
        }
        serde_json::Value::String(s) => Level::from_str_loose(s).map(Level::value),
        _ => None,
    }
}
