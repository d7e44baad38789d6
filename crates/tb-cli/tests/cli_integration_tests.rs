//! Integration tests for the tackle binary

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tackle(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tackle"))
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run tackle")
}

fn tackle_ok(project: &Path, args: &[&str]) -> String {
    let output = tackle(project, args);
    assert!(
        output.status.success(),
        "tackle {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn tackle_json(project: &Path, args: &[&str]) -> Value {
    serde_json::from_str(&tackle_ok(project, args)).unwrap()
}

/// A project with a cloud directory next to it.
fn init_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("cloud")).unwrap();
    tackle_ok(dir.path(), &["init", "--name", "test_box", "--cloud-dir", "cloud"]);
    dir
}

#[test]
fn test_commands_fail_without_config() {
    let dir = TempDir::new().unwrap();
    let output = tackle(dir.path(), &["ls"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration"));
}

#[test]
fn test_add_list_remove() {
    let dir = init_project();
    let project = dir.path();

    tackle_ok(
        project,
        &["add", "Ugly Stik", "-k", "Rods", "-a", "power=medium", "--equipped"],
    );
    tackle_ok(project, &["add", "Bucket hat", "-k", "Apparel", "-q", "2"]);

    let items = tackle_json(project, &["ls", "-o", "json"]);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Ugly Stik");
    assert_eq!(items[0]["attributes"]["power"], "medium");
    assert_eq!(items[1]["quantity"], 2);

    let packed = tackle_json(project, &["ls", "-o", "json", "--equipped"]);
    assert_eq!(packed.as_array().unwrap().len(), 1);

    let id = items[0]["id"].as_str().unwrap().to_string();
    tackle_ok(project, &["rm", &id]);
    let remaining = tackle_json(project, &["ls", "-o", "json"]);
    assert_eq!(remaining.as_array().unwrap().len(), 1);

    assert!(!tackle(project, &["rm", &id]).status.success());
}

#[test]
fn test_add_rejects_bad_attribute() {
    let dir = init_project();
    let output = tackle(dir.path(), &["add", "Rod", "-k", "Rods", "-a", "power=enormous"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("must be one of"));
}

#[test]
fn test_status_on_fresh_project() {
    let dir = init_project();

    let status = tackle_json(dir.path(), &["status", "-o", "json"]);

    assert_eq!(status["catalog"], "test_box");
    assert_eq!(status["sync_mode"], "local");
    assert_eq!(status["cloud_available"], true);
    assert_eq!(status["schema"], "tacklebox v2");
    assert_eq!(status["last_applied_version"], 0);
    assert_eq!(status["pending_migrations"], 1);
    assert_eq!(status["categories"], 5);
}

#[test]
fn test_sync_to_cloud_moves_items_and_records_history() {
    let dir = init_project();
    let project = dir.path();
    tackle_ok(project, &["add", "Tackle box"]);

    let out = tackle_ok(project, &["sync", "cloud"]);
    assert!(out.contains("Switched from local to cloud"));
    assert!(project.join("cloud").join("tacklebox.duckdb").exists());

    let status = tackle_json(project, &["status", "-o", "json"]);
    assert_eq!(status["sync_mode"], "cloud");
    assert_eq!(status["equipment"], 1);
    assert_eq!(status["last_applied_version"], 1);

    let history = tackle_json(project, &["history", "-o", "json"]);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["version"], 1);

    let again = tackle_ok(project, &["sync", "cloud"]);
    assert!(again.contains("Already using cloud"));
}

#[test]
fn test_sync_to_missing_cloud_dir_fails_and_stays_local() {
    let dir = TempDir::new().unwrap();
    let project = dir.path();
    tackle_ok(project, &["init", "--name", "no_cloud"]);

    let output = tackle(project, &["sync", "cloud"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("still using local"));

    let status = tackle_json(project, &["status", "-o", "json"]);
    assert_eq!(status["sync_mode"], "local");
    assert_eq!(status["cloud_available"], false);
}

#[test]
fn test_categories_listing() {
    let dir = init_project();
    let categories = tackle_json(dir.path(), &["categories", "-o", "json"]);
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Rods", "Reels", "Lures", "Line", "Apparel"]);
}
