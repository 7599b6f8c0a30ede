//! Configuration management with TOML file support.
//!
//! Merges settings from three sources (highest precedence first):
//! 1. CLI flags
//! 2. Config file (`~/.config/canonlog/config.toml` or `$XDG_CONFIG_HOME/canonlog/config.toml`)
//! 3. Built-in defaults
//!
//! The deployment color tag also reads `SERVICE_COLOR`, which sits between the
//! config file and the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::cli::{Cli, ColorMode};
use crate::error::LogError;
use crate::identity::SERVICE_COLOR_ENV;
use crate::level::Level;
use crate::normalize::Mode;
use crate::sink::FlushPolicy;

/// Where canonical records are shipped besides the console echo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// Console only; nothing is buffered.
    #[default]
    Console,
    /// Append NDJSON to this file through the buffered sink.
    File(PathBuf),
}

/// Runtime configuration merged from defaults, config file, and CLI arguments.
///
/// Use [`Config::from_cli`] to build from parsed CLI arguments, or
/// [`Config::default`] for built-in defaults (useful in tests and benchmarks).
#[derive(Debug, Clone)]
pub struct Config {
    /// Color output mode (auto/always/never).
    pub color_mode: ColorMode,
    /// Normalization applied to JSON input records.
    pub mode: Mode,
    /// Minimum severity to emit; `None` emits everything.
    pub min_level: Option<Level>,
    pub destination: Destination,
    /// Echo records to the console as compact JSON instead of text.
    pub console_json: bool,
    /// Echo records to the console at all.
    pub echo: bool,
    pub flush: FlushPolicy,
    /// Fields merged into every record on ALTER (and `service` on ADAPT).
    pub static_fields: Map<String, Value>,
    /// Deployment color tag, already resolved against `SERVICE_COLOR`.
    pub service_color: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Auto,
            mode: Mode::Alter,
            min_level: None,
            destination: Destination::Console,
            console_json: false,
            echo: true,
            flush: FlushPolicy::default(),
            static_fields: Map::new(),
            service_color: None,
        }
    }
}

impl Config {
    /// Build a [`Config`] from CLI arguments, loading the config file if present.
    ///
    /// Merge precedence: CLI flags > `SERVICE_COLOR` > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, LogError> {
        let mut config = Self::default();

        match &cli.config {
            Some(path) => config.apply_file_config(FileConfig::load(path)?)?,
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    config.apply_file_config(FileConfig::load(&path)?)?;
                }
            }
        }

        if let Some(color) = std::env::var(SERVICE_COLOR_ENV)
            .ok()
            .filter(|c| !c.is_empty())
        {
            config.service_color = Some(color);
        }

        if let Some(color) = cli.color {
            config.color_mode = color;
        }
        if let Some(mode) = cli.mode {
            config.mode = mode;
        }
        if cli.level.is_some() {
            config.min_level = cli.level;
        }
        if let Some(ref file) = cli.file {
            config.destination = Destination::File(file.clone());
        }
        if cli.json {
            config.console_json = true;
        }
        if cli.quiet {
            config.echo = false;
        }
        if let Some(size) = cli.flush_size {
            config.flush.flush_size = size;
        }
        if let Some(ms) = cli.flush_timeout_ms {
            config.flush.flush_timeout = Duration::from_millis(ms);
        }
        for (key, value) in &cli.fields {
            config.static_fields.insert(key.clone(), value.clone());
        }
        if cli.service_color.is_some() {
            config.service_color.clone_from(&cli.service_color);
        }

        if config.flush.flush_size == 0 {
            return Err(LogError::Config("flush size must be at least 1".to_string()));
        }

        Ok(config)
    }

    /// Default config file path: `$XDG_CONFIG_HOME/canonlog/config.toml` or `~/.config/canonlog/config.toml`.
    fn default_config_path() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("canonlog").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("canonlog")
                .join("config.toml")
        } else {
            PathBuf::from(".config/canonlog/config.toml")
        }
    }

    /// Apply settings from a parsed config file.
    fn apply_file_config(&mut self, file: FileConfig) -> Result<(), LogError> {
        if let Some(color) = file.color {
            self.color_mode = match color.as_str() {
                "always" => ColorMode::Always,
                "never" => ColorMode::Never,
                _ => ColorMode::Auto,
            };
        }
        if let Some(mode) = file.mode {
            self.mode = mode;
        }
        if let Some(level) = file.level {
            self.min_level = Some(Level::from_str_loose(&level).ok_or_else(|| {
                LogError::Config(format!("invalid level '{level}' in config file"))
            })?);
        }
        if let Some(path) = file.file {
            self.destination = Destination::File(path);
        }
        if let Some(console_json) = file.console_json {
            self.console_json = console_json;
        }
        if let Some(echo) = file.echo {
            self.echo = echo;
        }
        if let Some(size) = file.flush_size {
            self.flush.flush_size = size;
        }
        if let Some(ms) = file.flush_timeout_ms {
            self.flush.flush_timeout = Duration::from_millis(ms);
        }
        if let Some(fields) = file.fields {
            self.static_fields.extend(fields);
        }
        if file.service_color.is_some() {
            self.service_color = file.service_color;
        }
        Ok(())
    }
}

/// Config file structure (TOML deserialization).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    color: Option<String>,
    mode: Option<Mode>,
    level: Option<String>,
    file: Option<PathBuf>,
    console_json: Option<bool>,
    echo: Option<bool>,
    flush_size: Option<usize>,
    flush_timeout_ms: Option<u64>,
    service_color: Option<String>,
    fields: Option<Map<String, Value>>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, LogError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LogError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
