//! CLI 통합 테스트
//!
//! `cargo test -p essentials-cli --test cli_test`

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn essentials(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_essentials"))
        .arg("-C")
        .arg(project)
        .args(args)
        .env("HOME", project)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run essentials binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_catalog(project: &Path) {
    let catalog = r#"{
  "version": "1",
  "name": "local",
  "plugins": [
    { "id": "news", "name": "News", "type": "feature" },
    { "id": "lint", "name": "Lint", "type": "tool" }
  ]
}"#;
    std::fs::write(
        project.join(".essentials/resources/plugins.json"),
        catalog,
    )
    .unwrap();
}

#[test]
fn test_init_then_list() {
    let temp = TempDir::new().unwrap();
    let init = essentials(temp.path(), &["init", "--namespace", "acme"]);
    assert!(init.status.success(), "{:?}", init);
    assert!(temp.path().join(".essentials/config.json").exists());

    let list = essentials(temp.path(), &["plugins", "list"]);
    assert!(list.status.success());
    assert!(stdout(&list).contains("No plugins found."));
}

#[test]
fn test_install_reports_new_state() {
    let temp = TempDir::new().unwrap();
    assert!(essentials(temp.path(), &["init"]).status.success());
    write_catalog(temp.path());

    let list = essentials(temp.path(), &["--json", "plugins", "list"]);
    let plugins: serde_json::Value = serde_json::from_slice(&list.stdout).unwrap();
    assert_eq!(plugins.as_array().unwrap().len(), 2);
    assert_eq!(plugins[0]["installState"], "discovered");

    let install = essentials(temp.path(), &["--json", "plugins", "install", "news"]);
    assert!(install.status.success(), "{:?}", install);
    let doc: serde_json::Value = serde_json::from_slice(&install.stdout).unwrap();
    assert_eq!(doc["installationState"], "installed");

    // 이미 설치된 플러그인은 다시 설치할 수 없음
    let again = essentials(temp.path(), &["plugins", "install", "news"]);
    assert!(!again.status.success());
}

#[test]
fn test_unknown_plugin_fails() {
    let temp = TempDir::new().unwrap();
    assert!(essentials(temp.path(), &["init"]).status.success());

    let show = essentials(temp.path(), &["plugins", "show", "missing"]);
    assert!(!show.status.success());
}

#[test]
fn test_status_counts_tools_separately() {
    let temp = TempDir::new().unwrap();
    assert!(essentials(temp.path(), &["init"]).status.success());
    write_catalog(temp.path());

    let status = essentials(temp.path(), &["--json", "plugins", "status"]);
    assert!(status.status.success(), "{:?}", status);
    let info: serde_json::Value = serde_json::from_slice(&status.stdout).unwrap();
    assert_eq!(info["toolCount"], 1);
    assert_eq!(info["pluginCount"], 2);
    assert_eq!(info["installedFeatures"], 0);
}
