//! End-to-end tests for latplot
//!
//! These tests run the binary against real log files and check the exit
//! codes, the written image and the summary printed to stdout.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Benchmark output mixing both line shapes with noise
const MIXED_LOG: &str = "\
starting benchmark against 127.0.0.1:8080
GetDetail took 1500 us
GetDetail took 2500 us
PostReview;user42;restaurant7;3000
warmup done
GetDetail took 500 us
PostReview;user9;restaurant1;4500
";

/// Helper function to create a test command
fn create_test_cmd() -> Command {
    let mut cmd = Command::cargo_bin("latplot").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write_log(dir: &TempDir, name: &str, content: &[u8]) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn assert_png(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.len() > PNG_MAGIC.len(), "image at {} is empty", path.display());
    assert_eq!(&bytes[..8], &PNG_MAGIC);
}

#[test]
fn test_plot_written_next_to_input() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "bench.log", MIXED_LOG.as_bytes());

    create_test_cmd()
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_png(&dir.path().join("bench.log.png"));
}

#[test]
fn test_existing_png_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "bench.log", MIXED_LOG.as_bytes());
    let png = dir.path().join("bench.log.png");
    fs::write(&png, b"stale").unwrap();

    create_test_cmd().arg(&log).assert().success();

    assert_png(&png);
}

#[test]
fn test_missing_input_exits_with_io_code() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("absent.log");

    create_test_cmd()
        .arg(&log)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("absent.log"));

    assert!(!dir.path().join("absent.log.png").exists());
}

#[test]
fn test_empty_log_exits_with_empty_result_code() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "empty.log", b"");

    create_test_cmd()
        .arg(&log)
        .assert()
        .code(6)
        .stderr(predicate::str::contains("No latency lines found"));

    assert!(!dir.path().join("empty.log.png").exists());
}

#[test]
fn test_log_without_matches_exits_with_empty_result_code() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "noise.log", b"took 12 ms\nreq;abc\nlatency: 400 us\n");

    create_test_cmd()
        .arg(&log)
        .assert()
        .code(6)
        .stderr(predicate::str::contains("3 lines read"));
}

#[test]
fn test_json_summary() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "bench.log", MIXED_LOG.as_bytes());

    let output = create_test_cmd()
        .arg(&log)
        .arg("--summary")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["lines_read"], 7);
    assert_eq!(value["skipped_lines"], 2);
    assert_eq!(value["took_matches"], 3);
    assert_eq!(value["suffix_matches"], 2);
    assert_eq!(value["summary"]["count"], 5);
    assert_eq!(value["summary"]["min_ms"], 0.5);
    assert_eq!(value["summary"]["max_ms"], 4.5);
    assert!(value["output_path"].as_str().unwrap().ends_with("bench.log.png"));

    assert_png(&dir.path().join("bench.log.png"));
}

#[test]
fn test_text_summary() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "bench.log", MIXED_LOG.as_bytes());

    create_test_cmd()
        .arg(&log)
        .arg("--summary")
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Latency Summary"))
        .stdout(predicate::str::contains("Measurements: 5 of 7 lines"))
        .stdout(predicate::str::contains("4.500"));
}

#[test]
fn test_single_measurement() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "one.log", b"only;1000\n");

    let output = create_test_cmd()
        .arg(&log)
        .arg("-s")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["count"], 1);
    assert_eq!(value["summary"]["min_ms"], 1.0);
    assert_eq!(value["summary"]["max_ms"], 1.0);
}

#[test]
fn test_all_zero_latencies() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "zero.log", b"a took 0 us\nb took 0 us\n");

    create_test_cmd().arg(&log).assert().success();

    assert_png(&dir.path().join("zero.log.png"));
}

#[test]
fn test_invalid_utf8_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let mut content = b"req took 250 us\n".to_vec();
    content.extend_from_slice(&[0xff, 0xfe, b';', 0x80, b'\n']);
    content.extend_from_slice(b"x;750\n");
    let log = write_log(&dir, "binary.log", &content);

    let output = create_test_cmd()
        .arg(&log)
        .arg("--summary")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["lines_read"], 3);
    assert_eq!(value["summary"]["count"], 2);
    assert_eq!(value["summary"]["max_ms"], 0.75);
}

#[test]
fn test_large_log() {
    let dir = TempDir::new().unwrap();
    let content: String = (1..=5000)
        .map(|i| {
            if i % 2 == 0 {
                format!("req {} took {} us\n", i, i * 10)
            } else {
                format!("op;{};{}\n", i, i * 10)
            }
        })
        .collect();
    let log = write_log(&dir, "large.log", content.as_bytes());

    let output = create_test_cmd()
        .arg(&log)
        .arg("--summary")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["count"], 5000);
    assert_eq!(value["took_matches"], 2500);
    assert_eq!(value["suffix_matches"], 2500);
    assert_eq!(value["summary"]["max_ms"], 50.0);
}
