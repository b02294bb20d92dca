// ABOUTME: Integration tests for the hoist CLI commands.
// ABOUTME: Validates --help output, init, and argument errors that need no daemon.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn hoist_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hoist"))
}

#[test]
fn help_shows_commands() {
    hoist_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("pull"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("hoist.yml");

    hoist_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--image", "acme/web:dev"])
        .assert()
        .success();

    assert!(config_path.exists(), "hoist.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("acme/web:dev"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("hoist.yml");

    fs::write(&config_path, "images: []").unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn pull_without_name_or_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .arg("pull")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no images to pull"));
}

#[test]
fn pull_rejects_invalid_name() {
    let temp_dir = tempfile::tempdir().unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .args(["pull", "Not Valid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid image name"));
}

#[test]
fn build_src_requires_name() {
    hoist_cmd()
        .args(["build", "--src", "."])
        .assert()
        .failure();
}

#[test]
fn json_errors_are_json_lines() {
    let temp_dir = tempfile::tempdir().unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .args(["--json", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""event":"error""#))
        .stderr(predicate::str::contains("no images to build"));
}

#[test]
fn tcp_docker_host_fails_with_socket_hint() {
    let temp_dir = tempfile::tempdir().unwrap();

    hoist_cmd()
        .current_dir(temp_dir.path())
        .env("DOCKER_HOST", "tcp://127.0.0.1:2375")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported DOCKER_HOST"))
        .stderr(predicate::str::contains("Hint: set DOCKER_HOST=unix://"));
}
