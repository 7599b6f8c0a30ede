use std::io::{self, BufRead, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use canonlog::cli::{Cli, ColorMode};
use canonlog::config::{Config, Destination};
use canonlog::input::{Line, parse_line};
use canonlog::normalize::Mode;
use canonlog::stream::LogStream;

/// Filter directive variable for canonlog's own diagnostics.
const LOG_ENV: &str = "CANONLOG_LOG";

fn main() -> ExitCode {
    // Reset SIGPIPE to default behavior so upstream writers get a clean
    // SIGPIPE signal instead of a BrokenPipeError when canonlog exits early.
    reset_sigpipe();
    init_tracing();

    let cli = Cli::parse();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("canonlog: {e}");
            return ExitCode::from(1);
        }
    };

    let use_color = resolve_color_mode(config.color_mode);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("canonlog-flush")
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("canonlog: cannot start runtime: {e}");
            return ExitCode::from(1);
        }
    };
    let _guard = runtime.enter();

    if let Destination::File(path) = &config.destination
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        eprintln!("canonlog: cannot create {}: {e}", parent.display());
        return ExitCode::from(1);
    }

    let stream = match LogStream::from_config(&config, use_color) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("canonlog: {e}");
            return ExitCode::from(1);
        }
    };

    let correlation_id = cli.correlation_id.as_deref();
    let stdin = io::stdin();
    for line_result in stdin.lock().lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => continue,
            Err(e) => {
                eprintln!("canonlog: read error: {e}");
                stream.close();
                return ExitCode::from(2);
            }
        };

        match parse_line(&line, correlation_id) {
            Some(Line::Json(payload)) => stream.write(payload, config.mode),
            Some(Line::Text(record)) => stream.write_record(record, Mode::Alter),
            None => {}
        }
    }

    tracing::debug!(rejected = stream.rejected(), "input exhausted");
    stream.close();
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn resolve_color_mode(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            let stdout = io::stdout();
            if !stdout.is_terminal() {
                return false;
            }
            if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                return false;
            }
            if std::env::var("TERM").is_ok_and(|v| v == "dumb") {
                return false;
            }
            true
        }
    }
}

/// Reset SIGPIPE to the default (terminate) behavior.
///
/// By default, Rust ignores SIGPIPE to surface `BrokenPipe` I/O errors.
/// Restoring `SIG_DFL` lets the OS handle the signal normally.
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}
