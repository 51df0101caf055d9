use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn snote(server_url: &str, config_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("snote"));
    cmd.env_remove("SNOTE_PASSWORD")
        .arg("--api-url")
        .arg(server_url)
        .arg("--config-dir")
        .arg(config_dir);
    cmd
}

fn stored_credentials(config_dir: &Path) -> Option<serde_json::Value> {
    let path = config_dir.join("credentials.json");
    if !path.exists() {
        return None;
    }
    let content = std::fs::read_to_string(path).unwrap();
    Some(serde_json::from_str(&content).unwrap())
}

fn note_json(id: &str, title: &str) -> String {
    format!(
        r#"{{"id": "{}", "kind": "ideas", "title": "{}", "pinned": false, "is_done": false,
            "finished_at": null, "bg_color": "", "reminder_at": null, "labels": [],
            "data": {{"body": ""}}, "created_at": "2025-01-01T10:00:00Z",
            "updated_at": "2025-01-01T10:00:00Z"}}"#,
        id, title
    )
}

#[test]
fn test_login_stores_credentials() {
    let mut server = Server::new();
    let login = server
        .mock("POST", "/api/accounts/token/")
        .match_body(Matcher::Json(
            serde_json::json!({"username": "alice", "password": "secret"}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access": "A1", "refresh": "R1"}"#)
        .create();

    let dir = tempdir().unwrap();
    snote(&server.url(), dir.path())
        .args(["login", "alice", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice"));

    login.assert();
    let creds = stored_credentials(dir.path()).unwrap();
    assert_eq!(creds["access_token"], "A1");
    assert_eq!(creds["refresh_token"], "R1");
}

#[test]
fn test_login_recovers_from_corrupt_credentials() {
    let mut server = Server::new();
    let _login = server
        .mock("POST", "/api/accounts/token/")
        .with_status(200)
        .with_body(r#"{"access": "A1", "refresh": "R1"}"#)
        .create();

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("credentials.json"), "{truncated").unwrap();

    snote(&server.url(), dir.path())
        .args(["login", "alice", "--password", "secret"])
        .assert()
        .success();

    let creds = stored_credentials(dir.path()).unwrap();
    assert_eq!(creds["access_token"], "A1");
    assert_eq!(creds["refresh_token"], "R1");
}

#[test]
fn test_expired_token_is_refreshed_and_persisted() {
    let mut server = Server::new();
    let _login = server
        .mock("POST", "/api/accounts/token/")
        .with_status(200)
        .with_body(r#"{"access": "A1", "refresh": "R1"}"#)
        .create();
    let stale = server
        .mock("GET", "/api/notes/")
        .match_header("authorization", "Bearer A1")
        .with_status(401)
        .expect(1)
        .create();
    let refresh = server
        .mock("POST", "/api/accounts/token/refresh/")
        .match_body(Matcher::Json(serde_json::json!({"refresh_token": "R1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "A2"}"#)
        .expect(1)
        .create();
    let fresh = server
        .mock("GET", "/api/notes/")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{}]", note_json("n1", "Garden")))
        .expect(1)
        .create();

    let dir = tempdir().unwrap();
    snote(&server.url(), dir.path())
        .args(["login", "alice", "--password", "secret"])
        .assert()
        .success();

    snote(&server.url(), dir.path())
        .args(["notes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Garden"));

    stale.assert();
    refresh.assert();
    fresh.assert();
    let creds = stored_credentials(dir.path()).unwrap();
    assert_eq!(creds["access_token"], "A2");
    assert_eq!(creds["refresh_token"], "R1");
}

#[test]
fn test_rejected_refresh_logs_out() {
    let mut server = Server::new();
    let _stale = server
        .mock("GET", "/api/notes/recent/")
        .with_status(401)
        .with_body(r#"{"detail": "Given token not valid for any token type"}"#)
        .create();
    let refresh = server
        .mock("POST", "/api/accounts/token/refresh/")
        .with_status(400)
        .expect(1)
        .create();

    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("credentials.json"),
        r#"{"access_token": "A1", "refresh_token": "R1"}"#,
    )
    .unwrap();

    snote(&server.url(), dir.path())
        .args(["notes", "recent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("snote login"));

    refresh.assert();
    assert!(stored_credentials(dir.path()).is_none());

    snote(&server.url(), dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_logout_removes_credentials() {
    let server = Server::new();
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("credentials.json"),
        r#"{"access_token": "A1", "refresh_token": "R1"}"#,
    )
    .unwrap();

    snote(&server.url(), dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    assert!(stored_credentials(dir.path()).is_none());
}

#[test]
fn test_create_note_sends_bearer_token() {
    let mut server = Server::new();
    let create = server
        .mock("POST", "/api/notes/")
        .match_header("authorization", "Bearer A1")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "kind": "ideas",
            "title": "Garden",
            "data": {"body": "plant tomatoes"}
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(note_json("n9", "Garden"))
        .create();

    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("credentials.json"),
        r#"{"access_token": "A1", "refresh_token": "R1"}"#,
    )
    .unwrap();

    snote(&server.url(), dir.path())
        .args([
            "notes",
            "create",
            "--kind",
            "ideas",
            "--title",
            "Garden",
            "--body",
            "plant tomatoes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created n9"));

    create.assert();
}

#[test]
fn test_notes_without_login_are_unauthenticated() {
    let mut server = Server::new();
    let list = server
        .mock("GET", "/api/notes/")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_body(r#"{"detail": "Authentication credentials were not provided."}"#)
        .expect(1)
        .create();
    let refresh = server
        .mock("POST", "/api/accounts/token/refresh/")
        .expect(0)
        .create();

    let dir = tempdir().unwrap();
    snote(&server.url(), dir.path())
        .args(["notes", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication credentials were not provided"));

    list.assert();
    refresh.assert();
}
