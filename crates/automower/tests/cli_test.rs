//! Integration tests for the `automower` CLI binary.
//!
//! Argument parsing, help, completions and config handling run without a
//! network; account commands run against a wiremock stand-in for the
//! Automower Connect service.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `automower` binary with env isolation.
///
/// Clears all `AUTOMOWER_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn automower_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("automower");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("AUTOMOWER_PROFILE")
        .env_remove("AUTOMOWER_DEFAULT_PROFILE")
        .env_remove("AUTOMOWER_USERNAME")
        .env_remove("AUTOMOWER_PASSWORD")
        .env_remove("AUTOMOWER_AUTH_URL")
        .env_remove("AUTOMOWER_API_URL")
        .env_remove("AUTOMOWER_OUTPUT")
        .env_remove("AUTOMOWER_TIMEOUT");
    cmd
}

/// Command wired to a mock account.
fn account_cmd(home: &Path, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = automower_cmd(home);
    cmd.env("AUTOMOWER_USERNAME", "owner@example.com")
        .env("AUTOMOWER_PASSWORD", "hunter2")
        .env("AUTOMOWER_AUTH_URL", server.uri())
        .env("AUTOMOWER_API_URL", server.uri())
        .env("AUTOMOWER_TIMEOUT", "5");
    cmd
}

fn account_args(home: &Path, server: &MockServer, args: &[&str]) -> assert_cmd::Command {
    let mut cmd = account_cmd(home, server);
    cmd.args(args);
    cmd
}

/// Run a command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_account(status: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "tok-1", "attributes": { "provider": "husqvarna" } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/token/tok-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mowers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "m-1", "name": "Lawnie", "model": "G" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mowers/m-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status))
        .mount(&server)
        .await;
    server
}

fn status(mower_status: &str) -> Value {
    json!({
        "mowerStatus": mower_status,
        "storedTimestamp": 1_700_000_000_000_i64,
        "batteryPercent": 80,
        "lastErrorCode": 0,
        "nextStartSource": "NO_SOURCE",
        "lastLocations": [{ "latitude": 57.7, "longitude": 14.1 }]
    })
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = automower_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Automower")
                .and(predicate::str::contains("status"))
                .and(predicate::str::contains("park"))
                .and(predicate::str::contains("watch")),
        );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("automower"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .args(["--output", "xml", "list"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_and_use() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .args(["--profile", "cabin", "config", "set", "username", "owner@example.com"])
        .assert()
        .success();
    automower_cmd(home.path())
        .args(["config", "use", "cabin"])
        .assert()
        .success();

    automower_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cabin *"));
    automower_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("owner@example.com"));
}

#[test]
fn test_config_init_keeps_unreadable_config() {
    let home = TempDir::new().unwrap();
    let out = automower_cmd(home.path())
        .args(["config", "path"])
        .output()
        .unwrap();
    let config_path = String::from_utf8(out.stdout).unwrap().trim().to_owned();
    let config_path = Path::new(&config_path);
    std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    std::fs::write(config_path, "[profiles.home\nusername = ").unwrap();

    automower_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .failure();

    assert_eq!(
        std::fs::read_to_string(config_path).unwrap(),
        "[profiles.home\nusername = "
    );
}

#[test]
fn test_config_use_unknown_profile() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .args(["config", "use", "nowhere"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2);
}

// ── Account commands ────────────────────────────────────────────────

#[test]
fn test_list_without_credentials() {
    let home = TempDir::new().unwrap();
    automower_cmd(home.path())
        .arg("list")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("credentials"));
}

#[tokio::test]
async fn test_bad_credentials_exit_auth() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let output = run(account_args(home.path(), &server, &["list"])).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test]
async fn test_list_json() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("OK_CUTTING")).await;

    let output = run(account_args(home.path(), &server, &["-o", "json", "list"]))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let list = stdout_json(&output);
    assert_eq!(list[0]["name"], "Lawnie");
    assert_eq!(list[0]["model"], "G");
}

#[tokio::test]
async fn test_status_single_mower() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("OK_CUTTING")).await;

    let output = run(account_args(home.path(), &server, &["-o", "json", "status", "lawnie"]))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let state = stdout_json(&output);
    assert_eq!(state["status"], "Cutting");
    assert_eq!(state["status_code"], "OK_CUTTING");
    assert_eq!(state["battery_level"], 80);
    assert_eq!(state["icon"], "mdi:robot");
    assert_eq!(state["is_on"], true);
    assert!(state["attributes"].get("lastErrorCode").is_none());
}

#[tokio::test]
async fn test_status_table() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("PARKED_TIMER")).await;

    let output = run(account_args(home.path(), &server, &["status"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Lawnie"));
    assert!(stdout.contains("80%"));
}

#[tokio::test]
async fn test_status_unknown_mower() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("OK_CUTTING")).await;

    let output = run(account_args(home.path(), &server, &["status", "back-yard"]))
    .await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test]
async fn test_start_parked_mower_sends_start() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("PARKED_TIMER")).await;
    Mock::given(method("POST"))
        .and(path("/mowers/m-1/control"))
        .and(body_json(json!({ "action": "START" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(account_args(home.path(), &server, &["-o", "json", "start", "Lawnie"]))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let result = stdout_json(&output);
    assert_eq!(result["sent"], true);
    assert_eq!(result["status_code"], "EXECUTING_START");
}

#[tokio::test]
async fn test_start_charging_mower_is_skipped() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("OK_CHARGING")).await;
    Mock::given(method("POST"))
        .and(path("/mowers/m-1/control"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run(account_args(home.path(), &server, &["-o", "json", "start", "m-1"]))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(stdout_json(&output)["sent"], false);
}

#[tokio::test]
async fn test_park_always_sends_park() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("OK_CHARGING")).await;
    Mock::given(method("POST"))
        .and(path("/mowers/m-1/control"))
        .and(body_json(json!({ "action": "PARK" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(account_args(home.path(), &server, &["park", "Lawnie"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Preparing to park"));
}

#[tokio::test]
async fn test_rejected_command_fails() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("PARKED_TIMER")).await;
    Mock::given(method("POST"))
        .and(path("/mowers/m-1/control"))
        .respond_with(ResponseTemplate::new(500).set_body_string("mower offline"))
        .mount(&server)
        .await;

    let output = run(account_args(home.path(), &server, &["start", "Lawnie"])).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("rejected"));
}

#[tokio::test]
async fn test_watch_prints_location_updates() {
    let home = TempDir::new().unwrap();
    let server = mock_account(status("OK_CUTTING")).await;

    let output = run(account_args(home.path(), &server, &["-o", "json", "watch", "--count", "1"]))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap();
    let update: Value = serde_json::from_str(first).unwrap();
    assert_eq!(update["dev_id"], "automower_g_m_1");
    assert_eq!(update["gps"], json!([57.7, 14.1]));
    assert_eq!(update["attributes"]["status"], "Cutting");
}
