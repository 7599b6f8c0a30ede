//! Integration tests for mixed JSON and plain-text input.

use crate::{canonlog, json_lines};

#[test]
fn mixed_json_and_text() {
    let input = "{\"level\":40,\"time\":\"t\",\"msg\":\"disk low\"}\nplain text line\n";
    let output = canonlog()
        .arg("--color=never")
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "WARN @ t : disk low");
    assert!(lines[1].starts_with("INFO @ "));
    assert!(lines[1].ends_with(" : plain text line"));
}

#[test]
fn text_lines_are_always_altered() {
    let output = canonlog()
        .args(["--color=never", "--json", "--mode", "none"])
        .write_stdin("server started\n")
        .output()
        .unwrap();
    let record = &json_lines(&output.stdout)[0];
    assert_eq!(record["msg"], "server started");
    assert_eq!(record["loglevel"], "INFO");
    assert_eq!(record["loglevel_value"], 30);
    assert!(record["@timestamp"].is_string());
    assert!(record.get("time").is_none());
}

#[test]
fn text_line_with_correlation_id() {
    let output = canonlog()
        .args(["--color=never", "--json", "-x", "req-9"])
        .write_stdin("server started\n")
        .output()
        .unwrap();
    let record = &json_lines(&output.stdout)[0];
    assert_eq!(record["correlation-id"], "req-9");
    assert_eq!(record["msg"], "server started");
    assert!(record.get("msg_json").is_none());
}

#[test]
fn blank_lines_skipped() {
    let input = "\n   \n{\"level\":30,\"time\":\"t\",\"msg\":\"only\"}\n\n";
    canonlog()
        .arg("--color=never")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("INFO @ t : only\n");
}

#[test]
fn embedded_json_message_without_correlation() {
    let input = r#"{"level":30,"time":"t","msg":"{\"order\":17}"}"#;
    let output = canonlog()
        .args(["--color=never", "--json"])
        .write_stdin(input)
        .output()
        .unwrap();
    let record = &json_lines(&output.stdout)[0];
    assert_eq!(record["msg_json"], serde_json::json!({"order": 17}));
    assert!(record.get("msg").is_none());
}
