//! CLI integration tests
//!
//! These tests verify the command-line interface behavior, including:
//! - Command parsing and help output
//! - Output formatting
//! - Exit codes for configuration errors

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn pipewright_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pipewright"))
}

fn pipewright() -> Command {
    let mut command = Command::new(pipewright_bin());
    for key in [
        "PIPEWRIGHT_ENVIRONMENT",
        "PIPEWRIGHT_TEMPLATES_DIR",
        "PIPEWRIGHT_GITHUB_SERVICE",
        "PIPEWRIGHT_REMOTE",
        "PIPEWRIGHT_BROWSE",
        "PIPEWRIGHT_LOG_LEVEL",
        "RUST_LOG",
    ] {
        command.env_remove(key);
    }
    command
}

fn create_node_repo(dir: &TempDir) -> PathBuf {
    let repo_path = dir.path().to_path_buf();
    fs::write(repo_path.join("package.json"), r#"{"name": "shop"}"#)
        .expect("Failed to write package.json");
    fs::create_dir_all(repo_path.join("node_modules/left-pad"))
        .expect("Failed to create node_modules");
    fs::write(repo_path.join("node_modules/left-pad/setup.py"), "")
        .expect("Failed to write vendored manifest");
    repo_path
}

#[test]
fn test_cli_help() {
    let output = pipewright()
        .arg("--help")
        .output()
        .expect("Failed to execute pipewright");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pipewright"));
    assert!(stdout.contains("configure"));
    assert!(stdout.contains("templates"));
    assert!(stdout.contains("classify"));
}

#[test]
fn test_cli_version() {
    let output = pipewright()
        .arg("--version")
        .output()
        .expect("Failed to execute pipewright");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_classify_github_json() {
    let output = pipewright()
        .args(["classify", "git@github.com:octo/shop.git", "--format", "json"])
        .output()
        .expect("Failed to execute pipewright");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("classify prints JSON");
    assert_eq!(value["provider"], "github");
    assert_eq!(value["owner"], "octo");
    assert_eq!(value["repository"], "shop");
}

#[test]
fn test_classify_azure_repos_human() {
    let output = pipewright()
        .args(["classify", "https://dev.azure.com/contoso/My%20Project/_git/shop"])
        .output()
        .expect("Failed to execute pipewright");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Azure Repos"));
    assert!(stdout.contains("My Project"));
}

#[test]
fn test_classify_unsupported_host_fails() {
    let output = pipewright()
        .args(["classify", "https://gitlab.com/octo/shop.git"])
        .output()
        .expect("Failed to execute pipewright");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gitlab.com"));
}

#[test]
fn test_templates_ignore_vendored_manifests() {
    let dir = TempDir::new().unwrap();
    let repo = create_node_repo(&dir);

    let output = pipewright()
        .args(["templates", repo.to_str().unwrap(), "--format", "yaml"])
        .output()
        .expect("Failed to execute pipewright");

    assert!(output.status.success());
    let rows: serde_yaml::Value =
        serde_yaml::from_slice(&output.stdout).expect("templates prints YAML");
    let labels: Vec<&str> = rows
        .as_sequence()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert!(labels.contains(&"Node.js to Linux Web App"));
    assert!(!labels.iter().any(|l| l.starts_with("Python")));
    assert_eq!(labels.last(), Some(&"Build only"));
}

#[test]
fn test_templates_for_missing_path_fails() {
    let output = pipewright()
        .args(["templates", "/nonexistent/repository/path"])
        .output()
        .expect("Failed to execute pipewright");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_configure_without_environment_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("environment.yaml");

    let output = pipewright()
        .args(["configure", "--environment", missing.to_str().unwrap()])
        .output()
        .expect("Failed to execute pipewright");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_configure_rejects_invalid_service_variable() {
    let output = pipewright()
        .arg("configure")
        .env("PIPEWRIGHT_GITHUB_SERVICE", "jenkins")
        .output()
        .expect("Failed to execute pipewright");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jenkins"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let output = pipewright()
        .args(["-q", "-v", "classify", "https://github.com/octo/shop"])
        .output()
        .expect("Failed to execute pipewright");

    assert!(!output.status.success());
}
