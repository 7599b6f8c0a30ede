//! Integration tests for basic stdin->stdout piping.

use predicates::prelude::*;

use crate::canonlog;

const BUNYAN_LINE: &str = r#"{"name":"api","hostname":"box-1","pid":12,"level":30,"msg":"hello","time":"2026-01-15T10:30:00.123Z","v":0}"#;

#[test]
fn empty_stdin_exits_zero() {
    canonlog().write_stdin("").assert().success().stdout("");
}

#[test]
fn bunyan_line_renders_as_text() {
    canonlog()
        .arg("--color=never")
        .write_stdin(BUNYAN_LINE)
        .assert()
        .success()
        .stdout("INFO @ 2026-01-15T10:30:00.123Z : hello\n");
}

#[test]
fn every_line_is_echoed_in_order() {
    let input = [
        r#"{"level":30,"msg":"first","time":"t1"}"#,
        r#"{"level":40,"msg":"second","time":"t2"}"#,
        r#"{"level":50,"msg":"third","time":"t3"}"#,
    ]
    .join("\n");
    canonlog()
        .arg("--color=never")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("INFO @ t1 : first\nWARN @ t2 : second\nERROR @ t3 : third\n");
}

#[test]
fn unknown_level_rendered_as_unknown() {
    canonlog()
        .arg("--color=never")
        .write_stdin(r#"{"level":35,"msg":"odd","time":"t"}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("UNKNOWN @ t : odd"));
}

#[test]
fn json_console_echo_is_canonical() {
    let output = canonlog()
        .args(["--color=never", "--json"])
        .write_stdin(BUNYAN_LINE)
        .output()
        .unwrap();
    assert!(output.status.success());
    let records = crate::json_lines(&output.stdout);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["@timestamp"], "2026-01-15T10:30:00.123Z");
    assert_eq!(record["loglevel"], "INFO");
    assert_eq!(record["loglevel_value"], 30);
    assert_eq!(record["msg"], "hello");
    assert!(record.get("time").is_none());
    assert!(record.get("level").is_none());
    assert!(record.get("hostname").is_none());
    assert!(record.get("v").is_none());
    assert!(record.get("name").is_none());
    assert!(record["host"].is_string());
}

#[test]
fn correlated_message_is_flattened() {
    let input = r#"{"level":30,"time":"t","msg":"{\"correlation-id\":\"abc\",\"msg\":\"hello\"}"}"#;
    let output = canonlog()
        .args(["--color=never", "--json"])
        .write_stdin(input)
        .output()
        .unwrap();
    let record = &crate::json_lines(&output.stdout)[0];
    assert_eq!(record["correlation-id"], "abc");
    assert_eq!(record["msg"], "hello");
    assert!(record.get("msg_json").is_none());
}

#[test]
fn quiet_suppresses_echo() {
    canonlog()
        .arg("--quiet")
        .write_stdin(BUNYAN_LINE)
        .assert()
        .success()
        .stdout("");
}
