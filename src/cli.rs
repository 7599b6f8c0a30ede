//! Command-line argument definitions for `canonlog`.
//!
//! Uses [`clap`] derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde_json::Value;

use crate::level::Level;
use crate::normalize::Mode;

/// Normalize structured log records from stdin into the canonical schema.
///
/// Each JSON object line is normalized, echoed to stdout, and, with `--file`,
/// appended to a buffered NDJSON file. Plain-text lines are wrapped into a
/// record first.
#[derive(Debug, Parser)]
#[command(name = "canonlog", version, about, long_about = None)]
pub struct Cli {
    /// Control color output.
    ///
    /// `auto` enables colors only when stdout is a TTY and `NO_COLOR` is unset.
    #[arg(short = 'c', long, value_enum)]
    pub color: Option<ColorMode>,

    /// Minimum severity to emit: trace, debug, info, warn, error, fatal.
    ///
    /// Records below it are neither echoed nor written. Records without a
    /// readable severity always pass.
    #[arg(short = 'l', long, value_parser = parse_level_arg)]
    pub level: Option<Level>,

    /// Normalization applied to JSON input records.
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<Mode>,

    /// Append canonical records to this NDJSON file.
    ///
    /// The parent directory is created if missing.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Echo records to stdout as compact JSON instead of text.
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Do not echo records to stdout.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Number of buffered records that forces a file flush.
    #[arg(long)]
    pub flush_size: Option<usize>,

    /// Milliseconds after the last record before buffered records are flushed.
    #[arg(long)]
    pub flush_timeout_ms: Option<u64>,

    /// Static field merged into every record, as `key=value`.
    ///
    /// Values that parse as JSON keep their type; anything else is a string.
    #[arg(short = 'F', long = "field", value_parser = parse_field_arg)]
    pub fields: Vec<(String, Value)>,

    /// Deployment color tag (overrides `SERVICE_COLOR`).
    #[arg(long)]
    pub service_color: Option<String>,

    /// Correlation id attached to every record read from stdin.
    #[arg(short = 'x', long)]
    pub correlation_id: Option<String>,

    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Enable colors only when stdout is a TTY.
    Auto,
    /// Always enable colors.
    Always,
    /// Never enable colors.
    Never,
}

/// Parse a level name, case-insensitive.
fn parse_level_arg(s: &str) -> Result<Level, String> {
    Level::from_str_loose(s).ok_or_else(|| {
        format!("invalid level '{s}': expected one of trace, debug, info, warn, error, fatal")
    })
}

/// Parse a `key=value` static field.
fn parse_field_arg(s: &str) -> Result<(String, Value), String> {
    let Some((key, raw)) = s.split_once('=') else {
        return Err(format!("invalid field '{s}': expected key=value"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid field '{s}': empty key"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
