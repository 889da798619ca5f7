use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn tripmate(url: &str, config_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tripmate"));
    cmd.env_remove("TRIPMATE_PASSWORD")
        .arg("--api-url")
        .arg(url)
        .arg("--config-dir")
        .arg(config_dir);
    cmd
}

#[test]
fn test_login_whoami_logout() {
    let mut server = Server::new();
    let url = server.url();
    let config_dir = tempdir().unwrap();

    let mock_login = server
        .mock("POST", "/auth/login")
        .match_header("Authorization", Matcher::Missing)
        .match_body(Matcher::Json(serde_json::json!({
            "username": "alice",
            "password": "secret1"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "abc.def.ghi", "token_type": "bearer"}"#)
        .create();

    tripmate(&url, config_dir.path())
        .args(["login", "alice", "--password", "secret1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice"));
    mock_login.assert();

    let token_file = config_dir.path().join("token");
    assert_eq!(std::fs::read_to_string(&token_file).unwrap(), "abc.def.ghi");

    let mock_me = server
        .mock("GET", "/auth/me")
        .match_header("Authorization", "Bearer abc.def.ghi")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id": 1, "username": "alice", "email": "alice@example.com",
                "created_at": "2024-01-01T00:00:00"}"#,
        )
        .create();

    tripmate(&url, config_dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("alice <alice@example.com>"));
    mock_me.assert();

    tripmate(&url, config_dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!token_file.exists());
}

#[test]
fn test_validation_error_is_normalized() {
    let mut server = Server::new();
    let url = server.url();
    let config_dir = tempdir().unwrap();
    std::fs::write(config_dir.path().join("token"), "tok").unwrap();

    let _mock = server
        .mock("POST", "/expenses/")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"detail": [{"loc": ["body", "amount"], "msg": "Input should be greater than 0",
                "type": "greater_than", "ctx": {"gt": 0}}]}"#,
        )
        .create();

    tripmate(&url, config_dir.path())
        .args(["expense", "add", "--category", "food", "--amount", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be greater than 0"));
}

#[test]
fn test_unauthorized_prints_login_hint() {
    let mut server = Server::new();
    let url = server.url();
    let config_dir = tempdir().unwrap();

    let _mock = server
        .mock("GET", "/travel/plans")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Not authenticated"}"#)
        .create();

    tripmate(&url, config_dir.path())
        .args(["plan", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not authenticated"))
        .stderr(predicate::str::contains("tripmate login"));
}

#[test]
fn test_plan_delete_with_yes() {
    let mut server = Server::new();
    let url = server.url();
    let config_dir = tempdir().unwrap();
    std::fs::write(config_dir.path().join("token"), "tok").unwrap();

    let mock = server
        .mock("DELETE", "/travel/plans/3")
        .match_header("Authorization", "Bearer tok")
        .with_status(204)
        .create();

    tripmate(&url, config_dir.path())
        .args(["plan", "delete", "3", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted travel plan #3"));
    mock.assert();
}

#[test]
fn test_health_without_login() {
    let mut server = Server::new();
    let url = server.url();
    let config_dir = tempdir().unwrap();

    let _mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "healthy", "message": "AI travel planner is running"}"#)
        .create();

    tripmate(&url, config_dir.path())
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("healthy: AI travel planner is running"));
}
