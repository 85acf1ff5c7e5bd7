//! CLI integration tests
//!
//! Runs the `bililive` binary against a wiremock upstream.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{path, query_param},
};

/// Command isolated from the user's config directory and environment
fn bililive(config_home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bililive");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env_remove("BILILIVE_LOG_LEVEL")
        .env_remove("BILILIVE_LIVE_BASE")
        .env_remove("BILILIVE_API_BASE")
        .env_remove("BILILIVE_WWW_BASE");
    cmd
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    bililive(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    bililive(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("master-info"))
        .stdout(predicate::str::contains("common-areas"))
        .stdout(predicate::str::contains("ssl-probe"))
        .stdout(predicate::str::contains("insecure"));
}

#[test]
fn test_invalid_input_exits_with_failure() {
    let home = TempDir::new().unwrap();
    let output = bililive(&home)
        .args(["master-info", "--uid", "0"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "invalid_input");
}

#[test]
fn test_invalid_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(&config, "[client]\ntimeout_secs = 0\n").unwrap();

    bililive(&home)
        .arg("--config")
        .arg(&config)
        .arg("areas")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_master_info_against_mock_upstream() {
    let server = MockServer::start().await;
    Mock::given(path("/live_user/v1/Master/info"))
        .and(query_param("uid", "143474500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"info": {"uid": 143474500, "uname": "X"}, "room_id": 25322725}
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = bililive(&home)
        .env("BILILIVE_LIVE_BASE", server.uri())
        .args(["master-info", "--uid", "143474500"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["data"]["info"]["uname"], "X");
    assert_eq!(json["api_code"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_points_at_upstream() {
    let server = MockServer::start().await;
    Mock::given(path("/room/v1/Area/getList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": [{"id": 9, "name": "VTuber", "list": [
                {"id": "371", "parent_id": "9", "name": "Virtual", "parent_name": "VTuber"}
            ]}]
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(
        &config,
        format!("[endpoints]\nlive_base = \"{}\"\n", server.uri()),
    )
    .unwrap();

    bililive(&home)
        .arg("--config")
        .arg(&config)
        .arg("areas")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Virtual\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upstream_error_exits_with_failure() {
    let server = MockServer::start().await;
    Mock::given(path("/room/v1/Room/getRoomInfoOld"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": -400, "msg": "bad mid"})),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    bililive(&home)
        .env("BILILIVE_LIVE_BASE", server.uri())
        .args(["room-info-old", "--mid", "5"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"error\": \"bad mid\""))
        .stdout(predicate::str::contains("\"api_code\": -400"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_log_level_from_settings() {
    let server = MockServer::start().await;
    Mock::given(path("/x/frontend/finger/spi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"b_3": "a", "b_4": "b"}
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    bililive(&home)
        .env("BILILIVE_API_BASE", server.uri())
        .arg("buvid-spi")
        .assert()
        .success()
        .stderr(predicate::str::contains("retrieved").not());

    bililive(&home)
        .env("BILILIVE_API_BASE", server.uri())
        .env("BILILIVE_LOG_LEVEL", "info")
        .arg("buvid-spi")
        .assert()
        .success()
        .stderr(predicate::str::contains("buvid3 and buvid4 retrieved"));

    let config = home.path().join("config.toml");
    std::fs::write(&config, "[logging]\nlevel = \"info\"\n").unwrap();
    bililive(&home)
        .env("BILILIVE_API_BASE", server.uri())
        .arg("--config")
        .arg(&config)
        .arg("buvid-spi")
        .assert()
        .success()
        .stderr(predicate::str::contains("buvid3 and buvid4 retrieved"));
}
