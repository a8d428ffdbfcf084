//! End-to-end CLI tests for the zotero-recent binary.

use std::path::Path;

use assert_cmd::Command;
use chrono::{TimeDelta, Utc};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binary isolated from the caller's environment, config and `.env`.
fn isolated_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("zotero-recent").unwrap();
    cmd.current_dir(workdir)
        .env_remove("ZOTERO_LIBRARY_ID")
        .env_remove("ZOTERO_API_KEY")
        .env_remove("ZOTERO_LIBRARY_TYPE")
        .env_remove("ZOTERO_API_BASE_URL")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", workdir.join("config"))
        .env("HOME", workdir);
    cmd
}

async fn mock_library_with_one_pdf() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "key": "E1",
                "data": {
                    "itemType": "book",
                    "title": "Notes on / Rust",
                    "dateAdded": (Utc::now() - TimeDelta::hours(3)).to_rfc3339()
                }
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/42/items/E1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "key": "A1",
                "data": {
                    "itemType": "attachment",
                    "parentItem": "E1",
                    "linkMode": "imported_file",
                    "contentType": "application/pdf",
                    "filename": "notes.pdf"
                }
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/42/items/A1/file"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("zotero-recent").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--days"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("zotero-recent").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zotero-recent"));
}

#[test]
fn test_binary_invalid_flag_exits_one() {
    let mut cmd = Command::cargo_bin("zotero-recent").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_credentials_fail_before_prompt() {
    let temp_dir = TempDir::new().unwrap();
    isolated_cmd(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Enter DAYS_BACK").not())
        .stderr(predicate::str::contains("ZOTERO_LIBRARY_ID"))
        .stderr(predicate::str::contains("https://www.zotero.org/settings/keys"));
}

#[test]
fn test_credentials_from_dotenv_file_are_used() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(".env"),
        "ZOTERO_LIBRARY_ID=42\nZOTERO_API_KEY=from-dotenv\n",
    )
    .unwrap();
    // Invalid day count fails after credentials pass, so no network is needed
    isolated_cmd(temp_dir.path())
        .write_stdin("not-a-number\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Enter DAYS_BACK: "))
        .stderr(predicate::str::contains("DAYS_BACK must be"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config").join("zotero-recent");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "threads = 8\n").unwrap();

    isolated_cmd(temp_dir.path())
        .args(["--days", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_run_downloads_and_prints_summary() {
    let server = mock_library_with_one_pdf().await;
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("papers");

    isolated_cmd(temp_dir.path())
        .env("ZOTERO_LIBRARY_ID", "42")
        .env("ZOTERO_API_KEY", "secret")
        .args(["--days", "2", "--api-base-url", &server.uri()])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Download Summary ==="))
        .stdout(predicate::str::contains("Total attachments found: 1"))
        .stdout(predicate::str::contains("Successfully downloaded: 1"))
        .stdout(predicate::str::contains("Failed downloads: 0"))
        .stdout(predicate::str::contains("Files saved to: "));

    assert_eq!(std::fs::read(out.join("Notes_on_Rust.pdf")).unwrap(), b"%PDF");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_prompted_days_and_nothing_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    isolated_cmd(temp_dir.path())
        .args(["--library-id", "42", "--api-key", "secret"])
        .args(["--api-base-url", &server.uri()])
        .write_stdin("5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter DAYS_BACK: "))
        .stdout(predicate::str::contains("No recent items found."));
}
