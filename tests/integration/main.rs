//! Integration tests for the `canonlog` binary.

mod basic_pipe;
mod color_control;
mod file_sink;
mod mixed_input;
mod modes;

use assert_cmd::Command;

/// The binary with a config directory that does not exist and no inherited
/// deployment color.
#[allow(deprecated)]
pub fn canonlog() -> Command {
    let mut cmd = Command::cargo_bin("canonlog").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/tmp/canonlog-test-no-config");
    cmd.env_remove("SERVICE_COLOR");
    cmd.env_remove("CANONLOG_LOG");
    cmd
}

/// Parse every stdout line as JSON.
pub fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
