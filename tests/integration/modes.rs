//! Integration tests for `--mode` and non-object payloads.

use predicates::prelude::*;

use crate::{canonlog, json_lines};

#[test]
fn adapt_backfills_canonical_fields() {
    let output = canonlog()
        .args(["--color=never", "--json", "--mode", "adapt"])
        .args(["--field", "service=billing", "--service-color", "blue"])
        .write_stdin(r#"{"order":17}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let record = &json_lines(&output.stdout)[0];
    assert_eq!(record["order"], 17);
    assert_eq!(record["loglevel"], "INFO");
    assert_eq!(record["loglevel_value"], 30);
    assert_eq!(record["log_type"], "application");
    assert_eq!(record["application_type"], "service");
    assert_eq!(record["service"], "billing");
    assert_eq!(record["current_color"], "blue");
    assert_eq!(record["msg"], "[empty]");
    assert!(record["@timestamp"].is_string());
    assert!(record["host"].is_string());
    assert!(record["pid"].is_u64());
}

#[test]
fn adapt_keeps_existing_values() {
    let input = r#"{"@timestamp":"t","loglevel":"ERROR","loglevel_value":50,"msg":"boom","host":"web-3","pid":4}"#;
    let output = canonlog()
        .args(["--color=never", "--json", "--mode", "adapt"])
        .write_stdin(input)
        .output()
        .unwrap();
    let record = &json_lines(&output.stdout)[0];
    assert_eq!(record["@timestamp"], "t");
    assert_eq!(record["loglevel"], "ERROR");
    assert_eq!(record["loglevel_value"], 50);
    assert_eq!(record["host"], "web-3");
    assert_eq!(record["pid"], 4);
    assert_eq!(record["msg"], "boom");
}

#[test]
fn none_passes_records_through() {
    let output = canonlog()
        .args(["--color=never", "--json", "--mode", "none"])
        .write_stdin(r#"{"level":30,"time":"t","msg":"raw","v":0}"#)
        .output()
        .unwrap();
    let record = &json_lines(&output.stdout)[0];
    assert_eq!(
        record,
        &serde_json::json!({"level": 30, "time": "t", "msg": "raw", "v": 0})
    );
}

#[test]
fn unknown_mode_is_a_usage_error() {
    canonlog()
        .args(["--mode", "rewrite"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rewrite"));
}

#[test]
fn non_object_payload_dropped_with_diagnostic() {
    let input = "[1,2,3]\n\"just a string\"\n{\"level\":30,\"time\":\"t\",\"msg\":\"kept\"}\n";
    canonlog()
        .arg("--color=never")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("INFO @ t : kept\n")
        .stderr(predicate::str::contains("dropping log payload"));
}

#[test]
fn correlation_id_flag_attaches_to_records() {
    let output = canonlog()
        .args(["--color=never", "--json", "--correlation-id", "req-9"])
        .write_stdin("{\"level\":30,\"time\":\"t\",\"msg\":\"a\"}\n{\"correlation-id\":\"own\",\"msg\":\"b\"}\n")
        .output()
        .unwrap();
    let records = json_lines(&output.stdout);
    assert_eq!(records[0]["correlation-id"], "req-9");
    assert_eq!(records[1]["correlation-id"], "own");
}
