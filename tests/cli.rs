use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn tickerview() -> Command {
    Command::cargo_bin("tickerview").unwrap()
}

fn snapshot_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn help_lists_options() {
    tickerview()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--source"))
        .stdout(predicate::str::contains("--renderer"))
        .stdout(predicate::str::contains("--print"));
}

#[test]
fn print_renders_source_file() {
    let file = snapshot_file(
        r#"[
            {"symbol": "AAPL", "name": "Apple", "price": 150.0, "change": 1.2},
            {"symbol": "MSFT", "name": "Microsoft", "price": 1300.0, "change": -0.5}
        ]"#,
    );

    tickerview()
        .arg("--print")
        .arg("--source")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Symbol  Company"))
        .stdout(predicate::str::contains("AAPL    Apple        $150.00  +1.20%"))
        .stdout(predicate::str::contains("MSFT    Microsoft  $1,300.00  -0.50%"));
}

#[test]
fn print_with_mock_feed_lists_default_tickers() {
    let assert = tickerview().args(["--print", "--seed", "3"]).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert_eq!(output.lines().count(), 5);
    for symbol in ["NVDA", "AAPL", "MSFT", "AMZN"] {
        assert!(output.contains(symbol), "missing {symbol} in:\n{output}");
    }
}

#[test]
fn mock_feed_is_deterministic_per_seed() {
    let first = tickerview().args(["--print", "--seed", "9"]).output().unwrap();
    let second = tickerview().args(["--print", "--seed", "9"]).output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn malformed_source_fails() {
    let file = snapshot_file("not json");

    tickerview()
        .arg("--print")
        .arg("--source")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed snapshot"));
}

#[test]
fn missing_source_fails() {
    tickerview()
        .args(["--print", "--source", "/nonexistent/quotes.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open file"));
}

#[test]
fn log_flag_writes_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("tickerview.log");

    tickerview()
        .args(["--print", "--log"])
        .arg(&log)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Starting Tickerview"));
}

#[test]
fn unknown_renderer_is_rejected() {
    tickerview()
        .args(["--print", "--renderer", "webgl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
