//! Integration tests for color control: `NO_COLOR`, --color flag, `TERM`.

use crate::canonlog;

const LINE: &str = r#"{"level":30,"msg":"hello","time":"t"}"#;

#[test]
fn color_never_disables_ansi() {
    let output = canonlog()
        .arg("--color=never")
        .write_stdin(LINE)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains("\x1b["),
        "Should not contain ANSI escapes with --color=never"
    );
}

#[test]
fn color_always_enables_ansi() {
    let output = canonlog()
        .arg("--color=always")
        .write_stdin(LINE)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("\x1b["),
        "Should contain ANSI escapes with --color=always"
    );
    assert!(stdout.contains("INFO @ t : hello"));
}

#[test]
fn color_always_applies_to_json_echo() {
    let output = canonlog()
        .args(["--color=always", "--json"])
        .write_stdin(LINE)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("\x1b["));
}

#[test]
fn piped_output_has_no_color_by_default() {
    let output = canonlog().write_stdin(LINE).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains("\x1b["),
        "Piped output should not be colorized in auto mode"
    );
}

#[test]
fn no_color_env_disables_colors() {
    let output = canonlog()
        .env("NO_COLOR", "1")
        .write_stdin(LINE)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("\x1b["));
}
