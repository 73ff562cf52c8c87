//! Integration tests for the `reqstate` CLI binary.
//!
//! Argument parsing, config resolution, and full request runs against a
//! local wiremock server. Config directories are redirected to a temp dir
//! so tests never read the user's real configuration.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `reqstate` binary with env isolation.
fn reqstate_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("reqstate");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("REQSTATE_ENV")
        .env_remove("REQSTATE_ENVIRONMENT")
        .env_remove("REQSTATE_BASE_URL")
        .env_remove("REQSTATE_TIMEOUT")
        .env_remove("REQSTATE_CACHE_TTL")
        .env_remove("NODE_ENV")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

async fn envelope_server() -> MockServer {
    MockServer::start().await
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = reqstate_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    reqstate_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("request")
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    reqstate_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_unknown_method_is_usage_error() {
    let home = TempDir::new().unwrap();
    reqstate_cmd(&home)
        .args(["request", "fetch", "/clubs"])
        .assert()
        .code(2);
}

#[test]
fn test_empty_param_is_rejected() {
    let home = TempDir::new().unwrap();
    reqstate_cmd(&home)
        .args(["--base-url", "http://127.0.0.1:9", "request", "get", "/x", "-p", "q="])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("param 'q'"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults_to_development() {
    let home = TempDir::new().unwrap();
    let output = reqstate_cmd(&home).args(["config", "show"]).output().unwrap();
    assert!(output.status.success());

    let shown = stdout_json(&output);
    assert_eq!(shown["environment"], json!("development"));
    assert_eq!(shown["base_url"], json!("https://rysyclub.com/api"));
}

#[test]
fn test_config_show_env_flag_and_variable() {
    let home = TempDir::new().unwrap();
    let output = reqstate_cmd(&home)
        .args(["--env", "production", "config", "show"])
        .output()
        .unwrap();
    assert_eq!(
        stdout_json(&output)["base_url"],
        json!("http://47.108.164.241/api")
    );

    let output = reqstate_cmd(&home)
        .env("NODE_ENV", "production")
        .args(["config", "show"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output)["environment"], json!("production"));
}

#[test]
fn test_unknown_environment_fails() {
    let home = TempDir::new().unwrap();
    reqstate_cmd(&home)
        .env("REQSTATE_ENV", "staging")
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_init_then_file_is_used() {
    let home = TempDir::new().unwrap();
    let output = reqstate_cmd(&home).args(["config", "path"]).output().unwrap();
    let config_path = String::from_utf8(output.stdout).unwrap().trim().to_owned();

    reqstate_cmd(&home).args(["config", "init"]).assert().success();
    reqstate_cmd(&home)
        .args(["config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    std::fs::write(
        &config_path,
        "environment = \"production\"\n[base_urls]\nproduction = \"https://api.example.com\"\n",
    )
    .unwrap();
    let output = reqstate_cmd(&home).args(["config", "show"]).output().unwrap();
    assert_eq!(
        stdout_json(&output)["base_url"],
        json!("https://api.example.com/")
    );
}

// ── Requests ────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_get_prints_unwrapped_data() {
    let server = envelope_server().await;
    Mock::given(method("GET"))
        .and(path("/api/clubs"))
        .and(query_param("city", "zakopane"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": [{ "id": 1, "name": "Rysy" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let base = format!("{}/api", server.uri());
    let output = reqstate_cmd(&home)
        .args(["--base-url", &base, "request", "get", "/clubs", "-p", "city=zakopane"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let state = stdout_json(&output);
    assert_eq!(state["loading"], json!(false));
    assert_eq!(state["error"], Value::Null);
    assert_eq!(state["data"][0]["name"], json!("Rysy"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_params_become_body() {
    let server = envelope_server().await;
    Mock::given(method("POST"))
        .and(path("/clubs"))
        .and(body_json(json!({ "name": "Giewont", "size": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": { "id": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    reqstate_cmd(&home)
        .args(["--base-url", &server.uri(), "-o", "json-compact"])
        .args(["request", "post", "clubs", "-p", "name=Giewont", "-p", "size=3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""data":{"id":2}"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_envelope_exits_with_code() {
    let server = envelope_server().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "401",
            "data": null,
            "msg": "login required"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = reqstate_cmd(&home)
        .args(["--base-url", &server.uri(), "request", "get", "/me"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let state = stdout_json(&output);
    assert_eq!(state["error"]["code"], json!("401"));
    assert_eq!(state["error"]["body"]["msg"], json!("login required"));
    assert_eq!(state["data"], Value::Null);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeat_with_cache_key_hits_network_once() {
    let server = envelope_server().await;
    Mock::given(method("GET"))
        .and(path("/clubs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": { "id": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    reqstate_cmd(&home)
        .args(["--base-url", &server.uri(), "request", "get", "/clubs/1"])
        .args(["--cache-key", "club-1", "--repeat", "3"])
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_force_refresh_bypasses_cache() {
    let server = envelope_server().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "000",
            "data": 1
        })))
        .expect(2)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    reqstate_cmd(&home)
        .args(["--base-url", &server.uri(), "request", "get", "/n"])
        .args(["--cache-key", "n", "--repeat", "2", "--force-refresh"])
        .assert()
        .success();
}

#[test]
fn test_unreachable_server_is_connection_error() {
    let home = TempDir::new().unwrap();
    let output = reqstate_cmd(&home)
        .args(["--base-url", "http://127.0.0.1:9", "request", "get", "/clubs"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
    assert!(stdout_json(&output)["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Transport failure"));
}
