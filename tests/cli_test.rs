//! CLI Interface Tests
//!
//! Runs the keyit binary against a database in a temporary directory.

#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.toml");
        let data_dir = dir.path().join("data");
        std::fs::write(
            &config,
            format!("data_dir = {:?}\nbible_name = \"CLI Bible\"\n", data_dir.display().to_string()),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_keyit"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env("NO_COLOR", "1")
            .output()
            .unwrap()
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "keyit {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_keyit"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("keyit"));
    assert!(stdout.contains("export"));
}

#[test]
fn test_setup_uses_configured_name() {
    let ws = Workspace::new();
    let out = ws.stdout(&["setup"]);
    assert!(out.contains("CLI Bible"));
    assert!(out.contains("66 books"));
    assert!(ws.path().join("data").join("kdb.sqlite").exists());
}

#[test]
fn test_keyboard_and_export() {
    let ws = Workspace::new();
    ws.stdout(&["setup", "--name", "Kuna Bible"]);
    ws.stdout(&["book", "JUD"]);
    ws.stdout(&["chapter", "1"]);
    ws.stdout(&["edit", "Jude, the servant of Jesus Christ"]);
    ws.stdout(&["item", "1"]);
    ws.stdout(&["edit", "Mercy unto you"]);

    let out = ws.stdout(&["action", "crParaBef"]);
    assert!(out.contains("crParaBef"));

    let usfm_path = ws.path().join("JUD1.usfm");
    ws.stdout(&["export", "--output", usfm_path.to_str().unwrap()]);
    let usfm = std::fs::read_to_string(usfm_path).unwrap();
    assert!(usfm.starts_with(
        "\\id JUD Kuna Bible\n\\c 1\n\\v 1 Jude, the servant of Jesus Christ\n\\p\n\\v 2 Mercy unto you\n\\v 3 "
    ));
}

#[test]
fn test_menu_json() {
    let ws = Workspace::new();
    ws.stdout(&["book", "19"]);
    ws.stdout(&["chapter", "3"]);
    let out = ws.stdout(&["--json", "menu"]);
    let menu: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(menu["item_type"], "Ascription");
    assert_eq!(menu["items"][0]["action"], "DeleteAscription");
}

#[test]
fn test_invalid_action_fails() {
    let ws = Workspace::new();
    ws.stdout(&["book", "MAT"]);
    ws.stdout(&["chapter", "2"]);
    let output = ws.run(&["action", "unBrid"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unBrid"));

    let output = ws.run(&["action", "noSuchCode"]);
    assert!(!output.status.success());
}

#[test]
fn test_items_requires_chapter() {
    let ws = Workspace::new();
    let output = ws.run(&["items"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No current Book"));
}

#[test]
fn test_assets_listed() {
    let ws = Workspace::new();
    let out = ws.stdout(&["assets"]);
    for name in ["BridgePubItem", "CreatePubItem", "DeletePubItem", "KIT Logo", "UnbridgePubItem"] {
        assert!(out.contains(name));
    }
    assert!(out.contains("kitsui"));
    assert!(out.contains("AppLogo"));
    assert!(out.contains("KITLogoD"));
}

#[test]
fn test_assets_json_grouped_by_target() {
    let ws = Workspace::new();
    let out = ws.stdout(&["--json", "assets"]);
    let manifest: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(manifest["kitios"].as_array().unwrap().len(), 5);
    assert_eq!(manifest["kitsui"], serde_json::json!(["AppLogo", "KITLogoD"]));
}
