//! End-to-end CLI tests for the apache-dl binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

mod support;
use support::socket_guard::start_mock_server_or_skip;

use assert_cmd::Command;
use predicates::prelude::*;
use sha2::{Digest, Sha512};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTIFACT: &str = "kafka/3.7.0/kafka_2.13-3.7.0.tgz";
const FILE_NAME: &str = "kafka_2.13-3.7.0.tgz";

/// Command isolated from the user's config file and log settings.
fn apache_dl(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("apache-dl").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

async fn mount_current_release(server: &MockServer, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path("/dyn/closer.cgi"))
        .and(query_param("filename", ARTIFACT))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/dist/{ARTIFACT}.sha512")))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(hex::encode(Sha512::digest(body))),
        )
        .mount(server)
        .await;
}

fn host_args(server: &MockServer) -> Vec<String> {
    let base = server.uri();
    vec![
        "--mirror-url".to_string(),
        format!("{base}/dyn/closer.cgi"),
        "--downloads-url".to_string(),
        format!("{base}/"),
        "--archive-url".to_string(),
        format!("{base}/archive/"),
    ]
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("apache-dl").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download an Apache release artifact"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("apache-dl").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("apache-dl"));
}

#[test]
fn test_binary_requires_artifact_path() {
    let mut cmd = Command::cargo_bin("apache-dl").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("PATH"));
}

#[test]
fn test_binary_refuses_to_overwrite_existing_file() {
    let tempdir = TempDir::new().unwrap();
    let existing = tempdir.path().join(FILE_NAME);
    std::fs::write(&existing, b"old").unwrap();

    apache_dl(&tempdir.path().join("xdg-config"))
        // Unroutable hosts: the check must fail before any request.
        .args(["--mirror-url", "http://127.0.0.1:1/closer.cgi"])
        .args(["--downloads-url", "http://127.0.0.1:1/"])
        .args(["--archive-url", "http://127.0.0.1:1/"])
        .arg("-o")
        .arg(tempdir.path())
        .arg(ARTIFACT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("Done.").not());
    assert_eq!(std::fs::read(&existing).unwrap(), b"old");
}

#[test]
fn test_binary_rejects_unknown_config_key() {
    let tempdir = TempDir::new().unwrap();
    let config = tempdir.path().join("custom.toml");
    std::fs::write(&config, "concurrency = 4\n").unwrap();

    apache_dl(&tempdir.path().join("xdg-config"))
        .arg("--config")
        .arg(&config)
        .arg(ARTIFACT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_binary_rejects_invalid_host_url() {
    let tempdir = TempDir::new().unwrap();
    apache_dl(&tempdir.path().join("xdg-config"))
        .args(["--archive-url", "not a url"])
        .arg(ARTIFACT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("archive"));
}

#[tokio::test]
async fn test_binary_downloads_and_verifies_into_directory() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let body = vec![7u8; 10_000];
    mount_current_release(&server, &body).await;

    let tempdir = TempDir::new().unwrap();
    apache_dl(&tempdir.path().join("xdg-config"))
        .args(host_args(&server))
        .arg("-o")
        .arg(tempdir.path())
        .arg(ARTIFACT)
        .assert()
        .success()
        .stderr(predicate::str::contains("Done."));

    assert_eq!(std::fs::read(tempdir.path().join(FILE_NAME)).unwrap(), body);
}

#[tokio::test]
async fn test_binary_quiet_stdout_mode_writes_only_artifact_bytes() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let body = b"artifact on stdout".to_vec();
    mount_current_release(&server, &body).await;

    let tempdir = TempDir::new().unwrap();
    let assert = apache_dl(&tempdir.path().join("xdg-config"))
        .args(host_args(&server))
        .args(["-q", "-o", "-"])
        .arg(ARTIFACT)
        .assert()
        .success();

    assert_eq!(assert.get_output().stdout, body);
    assert!(
        !String::from_utf8_lossy(&assert.get_output().stderr).contains("Done."),
        "quiet mode must not print Done."
    );
}

#[tokio::test]
async fn test_binary_reports_digest_mismatch() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/dyn/closer.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tampered".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/dist/{ARTIFACT}.sha512")))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(hex::encode(Sha512::digest(b"genuine"))),
        )
        .mount(&server)
        .await;

    let tempdir = TempDir::new().unwrap();
    apache_dl(&tempdir.path().join("xdg-config"))
        .args(host_args(&server))
        .arg("-o")
        .arg(tempdir.path())
        .arg(ARTIFACT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("SHA-512 mismatch"));
}

#[tokio::test]
async fn test_binary_reads_hosts_from_config_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let body = vec![1u8; 300];
    mount_current_release(&server, &body).await;

    let tempdir = TempDir::new().unwrap();
    let config_home = tempdir.path().join("xdg-config");
    let config_dir = config_home.join("apache-dl");
    std::fs::create_dir_all(&config_dir).unwrap();
    let base = server.uri();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "mirror_url = \"{base}/dyn/closer.cgi\"\ndownloads_url = \"{base}/\"\narchive_url = \"{base}/archive/\"\nchunk_size = 100\n"
        ),
    )
    .unwrap();

    let output = tempdir.path().join("out.tgz");
    apache_dl(&config_home)
        .arg("-o")
        .arg(&output)
        .arg(ARTIFACT)
        .assert()
        .success();

    assert_eq!(std::fs::read(&output).unwrap(), body);
}
