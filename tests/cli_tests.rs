//! CLI integration tests.

mod support;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use support::config::{write_temp_file, BINARY_CONFIG};

const SCRIPT: &str = r#"
[[op]]
kind = "buy"
actor = "alice"
amount = 0.1
outcome = 0

[[op]]
kind = "sell"
actor = "bob"
amount = 50.0
outcome = 1

[[op]]
kind = "provide"
actor = "lp"
amount = 2.0
"#;

fn rikiddo() -> Command {
    cargo_bin_cmd!("rikiddo")
}

#[test]
fn test_help() {
    rikiddo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("quote"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn test_version() {
    rikiddo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rikiddo"));
}

#[test]
fn check_prints_the_opening_state() {
    let config = write_temp_file(BINARY_CONFIG);
    rikiddo()
        .args(["check", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("rain-tomorrow"))
        .stdout(predicate::str::contains("0.500000"));
}

#[test]
fn check_returns_nonzero_on_config_error() {
    let config = write_temp_file("[market.model]\ntype = \"scoring_rule\"\nvig = 1.5\n");
    rikiddo()
        .args(["check", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("vig"));
}

#[test]
fn check_reports_a_missing_file() {
    rikiddo()
        .args(["check", "--config", "/nonexistent/rikiddo.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn quote_prints_price_for_a_buy_and_a_sale() {
    let config = write_temp_file(BINARY_CONFIG);
    rikiddo()
        .args(["quote", "--outcome", "0", "--delta", "0.5", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Price"))
        .stdout(predicate::str::contains("Yes"));

    rikiddo()
        .args(["quote", "--outcome", "1", "--delta", "-0.2", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-0."));
}

#[test]
fn quote_rejects_unknown_outcome() {
    let config = write_temp_file(BINARY_CONFIG);
    rikiddo()
        .args(["quote", "--outcome", "9", "--delta", "1.0", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn replay_prints_book_and_rejections() {
    let config = write_temp_file(BINARY_CONFIG);
    let script = write_temp_file(SCRIPT);
    rikiddo()
        .args(["replay", "--config"])
        .arg(config.path())
        .arg("--script")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Book"))
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("provide"))
        .stdout(predicate::str::contains("insufficient shares"));
}

#[test]
fn replay_json_is_machine_readable() {
    let config = write_temp_file(BINARY_CONFIG);
    let script = write_temp_file(SCRIPT);
    let output = rikiddo()
        .args(["replay", "--json", "--config"])
        .arg(config.path())
        .arg("--script")
        .arg(script.path())
        .output()
        .expect("run rikiddo");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["summary"]["trades"], 1);
    assert_eq!(report["book"].as_array().map(Vec::len), Some(5));
    assert_eq!(report["rejected"][0]["index"], 1);
    assert_eq!(report["rejected"][0]["kind"], "sell");
}

#[test]
fn replay_rejects_a_malformed_script() {
    let config = write_temp_file(BINARY_CONFIG);
    let script = write_temp_file("[[op]]\nkind = \"teleport\"\nactor = \"x\"\namount = 1.0\n");
    rikiddo()
        .args(["replay", "--config"])
        .arg(config.path())
        .arg("--script")
        .arg(script.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse script"));
}
