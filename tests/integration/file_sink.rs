//! Integration tests for the buffered NDJSON file destination.

use std::fs;

use predicates::prelude::*;

use crate::canonlog;

fn read_records(path: &std::path::Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn records_flushed_in_order_at_exit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("service-log.json");
    let input: String = (0..3)
        .map(|i| format!("{{\"level\":30,\"time\":\"t\",\"msg\":\"m{i}\"}}\n"))
        .collect();

    canonlog()
        .args(["--quiet", "--file"])
        .arg(&path)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("");

    let records = read_records(&path);
    let msgs: Vec<_> = records.iter().map(|r| r["msg"].as_str().unwrap()).collect();
    assert_eq!(msgs, ["m0", "m1", "m2"]);
    for record in &records {
        assert_eq!(record["loglevel"], "INFO");
        assert_eq!(record["@timestamp"], "t");
    }
}

#[test]
fn more_records_than_flush_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.json");
    let input: String = (0..25)
        .map(|i| format!("{{\"n\":{i}}}\n"))
        .collect();

    canonlog()
        .args(["--quiet", "--flush-size", "10", "--file"])
        .arg(&path)
        .write_stdin(input)
        .assert()
        .success();

    let records = read_records(&path);
    assert_eq!(records.len(), 25);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["n"], i);
    }
}

#[test]
fn parent_directory_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("logs").join("out.json");

    canonlog()
        .args(["--quiet", "--file"])
        .arg(&path)
        .write_stdin("{\"msg\":\"hello\"}\n")
        .assert()
        .success();

    assert_eq!(read_records(&path).len(), 1);
}

#[test]
fn existing_file_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.json");
    fs::write(&path, "{\"msg\":\"old\"}\n").unwrap();

    canonlog()
        .args(["--quiet", "--file"])
        .arg(&path)
        .write_stdin("{\"msg\":\"new\"}\n")
        .assert()
        .success();

    let records = read_records(&path);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["msg"], "old");
    assert_eq!(records[1]["msg"], "new");
}

#[test]
fn file_destination_still_echoes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.json");

    canonlog()
        .args(["--color=never", "--file"])
        .arg(&path)
        .write_stdin("{\"level\":50,\"time\":\"t\",\"msg\":\"boom\"}\n")
        .assert()
        .success()
        .stdout("ERROR @ t : boom\n");

    assert_eq!(read_records(&path)[0]["loglevel_value"], 50);
}

#[test]
fn unwritable_destination_fails() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending.
    canonlog()
        .arg("--file")
        .arg(dir.path())
        .write_stdin("{\"msg\":\"x\"}\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("canonlog:"));
}

#[test]
fn zero_flush_size_rejected() {
    canonlog()
        .args(["--flush-size", "0"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("flush size"));
}
