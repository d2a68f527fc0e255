//! Integration tests for the brick binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A `brick` invocation against an isolated storage root.
fn brick(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("brick"));
    cmd.arg("--root")
        .arg(root)
        .env_remove("BRICK_HOME")
        .env_remove("GITHUB_TOKEN")
        .env_remove("BRICK_GITHUB_API_URL")
        .env("NO_COLOR", "1");
    cmd
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.ts"), "export const a = 1;\n").unwrap();
    fs::create_dir_all(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("sub/b.ts"), "export const b = 2;\n").unwrap();
    temp
}

fn save_demo(root: &Path, src: &Path) {
    brick(root)
        .args(["save", "demo", "--path"])
        .arg(src)
        .assert()
        .success();
}

fn list_json(root: &Path) -> Vec<Value> {
    let output = brick(root).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    value.as_array().unwrap().clone()
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("brick"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("reusable file templates"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("brick"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn save_list_info_apply_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    save_demo(root.path(), src.path());

    let listed = list_json(root.path());
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "demo");
    assert_eq!(listed[0]["type"], "local");

    let output = brick(root.path()).args(["info", "demo", "--json"]).output()?;
    let info: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(info["metadata"]["files"], json!(["a.ts", "sub/b.ts"]));

    let dest = TempDir::new()?;
    brick(root.path())
        .args(["apply", "demo", "--force"])
        .arg(dest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 file(s)"));

    assert_eq!(
        fs::read_to_string(dest.path().join("a.ts"))?,
        "export const a = 1;\n"
    );
    assert_eq!(
        fs::read_to_string(dest.path().join("sub/b.ts"))?,
        "export const b = 2;\n"
    );
    Ok(())
}

#[test]
fn list_table_shows_numbers() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    save_demo(root.path(), src.path());

    brick(root.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("local"));
    Ok(())
}

#[test]
fn apply_without_flags_skips_conflicts_when_not_interactive() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    save_demo(root.path(), src.path());

    let dest = TempDir::new()?;
    fs::write(dest.path().join("a.ts"), "mine")?;

    brick(root.path())
        .args(["apply", "1"])
        .arg(dest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("skip"));

    assert_eq!(fs::read_to_string(dest.path().join("a.ts"))?, "mine");
    assert!(dest.path().join("sub/b.ts").exists());
    Ok(())
}

#[test]
fn prompt_answer_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    save_demo(root.path(), src.path());

    let dest = TempDir::new()?;
    fs::write(dest.path().join("a.ts"), "mine")?;

    brick(root.path())
        .env("BRICK_PROMPT_CONFLICT", "overwrite")
        .args(["apply", "demo"])
        .arg(dest.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dest.path().join("a.ts"))?,
        "export const a = 1;\n"
    );
    Ok(())
}

#[test]
fn apply_rejects_force_with_skip_existing() {
    let root = TempDir::new().unwrap();
    brick(root.path())
        .args(["apply", "demo", "--force", "--skip-existing"])
        .assert()
        .failure();
}

#[test]
fn unknown_template_fails() {
    let root = TempDir::new().unwrap();
    brick(root.path())
        .args(["info", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template not found: ghost"));
}

#[test]
fn invalid_name_is_rejected() {
    let root = TempDir::new().unwrap();
    let src = project();
    brick(root.path())
        .args(["save", "bad name", "--path"])
        .arg(src.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid template name"));
    assert!(!root.path().join("store.json").exists());
}

#[test]
fn delete_requires_confirmation() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    save_demo(root.path(), src.path());

    brick(root.path())
        .args(["delete", "demo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cancelled"));
    assert_eq!(list_json(root.path()).len(), 1);

    brick(root.path())
        .args(["delete", "demo", "--yes"])
        .assert()
        .success();
    assert!(list_json(root.path()).is_empty());
    assert!(!root.path().join("templates/demo").exists());
    Ok(())
}

#[test]
fn index_resolution_follows_registry_order() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    for name in ["alpha", "beta", "gamma"] {
        brick(root.path())
            .args(["save", name, "--files", "a.ts", "--path"])
            .arg(src.path())
            .assert()
            .success();
    }

    let output = brick(root.path()).args(["info", "2", "--json"]).output()?;
    let info: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(info["name"], "beta");

    brick(root.path()).args(["delete", "alpha", "-y"]).assert().success();

    let output = brick(root.path()).args(["info", "2", "--json"]).output()?;
    let info: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(info["name"], "gamma");
    Ok(())
}

#[test]
fn export_import_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    save_demo(root.path(), src.path());

    let out = TempDir::new()?;
    let archive = out.path().join("demo.tar.gz");
    brick(root.path())
        .args(["export", "demo", "-o"])
        .arg(&archive)
        .assert()
        .success();
    assert!(archive.is_file());

    let other_root = TempDir::new()?;
    brick(other_root.path())
        .arg("import")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 'demo'"));

    let dest = TempDir::new()?;
    brick(other_root.path())
        .args(["apply", "demo", "--force"])
        .arg(dest.path())
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dest.path().join("sub/b.ts"))?,
        "export const b = 2;\n"
    );
    Ok(())
}

#[test]
fn add_remove_and_tree() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    brick(root.path())
        .args(["save", "demo", "--files", "a.ts", "--path"])
        .arg(src.path())
        .assert()
        .success();

    brick(root.path())
        .args(["add", "demo", "sub", "--from"])
        .arg(src.path())
        .assert()
        .success();

    brick(root.path())
        .args(["tree", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sub/"))
        .stdout(predicate::str::contains("b.ts"));

    brick(root.path())
        .args(["remove", "demo", "sub"])
        .assert()
        .success();

    let output = brick(root.path()).args(["info", "demo", "--json"]).output()?;
    let info: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(info["metadata"]["files"], json!(["a.ts"]));
    Ok(())
}

#[test]
fn save_reports_partial_failure_with_exit_code_two() -> Result<(), Box<dyn std::error::Error>> {
    let root = TempDir::new()?;
    let src = project();
    brick(root.path())
        .args(["save", "demo", "--files", "a.ts,missing.ts", "--path"])
        .arg(src.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing.ts"));

    let output = brick(root.path()).args(["info", "demo", "--json"]).output()?;
    let info: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(info["metadata"]["files"], json!(["a.ts"]));
    Ok(())
}

#[test]
fn config_set_and_get() {
    let root = TempDir::new().unwrap();
    brick(root.path())
        .args(["config", "set", "ignore", "vendor,tmp"])
        .assert()
        .success();
    brick(root.path())
        .args(["config", "get", "ignore"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vendor,tmp"));
}

#[test]
fn link_and_pull_from_github() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/kits/contents/react")
            .query_param("ref", "main");
        then.status(200).json_body(json!([
            {"name": "index.ts", "path": "react/index.ts", "type": "file"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/kits/contents/react/index.ts")
            .query_param("ref", "main");
        then.status(200).body("export {};\n");
    });

    let root = TempDir::new()?;
    brick(root.path())
        .args(["link", "kit", "acme/kits/react"])
        .assert()
        .success();
    assert_eq!(list_json(root.path())[0]["type"], "remote");

    brick(root.path())
        .env("BRICK_GITHUB_API_URL", server.base_url())
        .args(["pull", "kit"])
        .assert()
        .success();

    assert_eq!(list_json(root.path())[0]["type"], "local");
    assert_eq!(
        fs::read_to_string(root.path().join("templates/kit/index.ts"))?,
        "export {};\n"
    );
    Ok(())
}

#[test]
fn completions_for_bash() {
    Command::new(cargo_bin("brick"))
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brick"));
}
