use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn airul(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("airul").unwrap();
    cmd.arg("--base-dir").arg(dir).env("RUST_LOG", "off");
    cmd
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn generates_from_persisted_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "README.md", "# Test Project\nThis is a test README");
    write(dir.path(), "docs/guide.md", "# Documentation\nThis is test documentation");
    write(
        dir.path(),
        ".airul.json",
        r#"{
            "sources": ["README.md", "docs/*.md", "non-existent.md"],
            "output": { "cursor": true, "windsurf": false, "copilot": false }
        }"#,
    );

    airul(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files for AI context"))
        .stdout(predicate::str::contains("✓ README.md"))
        .stdout(predicate::str::contains("✓ docs/guide.md"))
        .stdout(predicate::str::contains("✗ non-existent.md"))
        .stdout(predicate::str::contains(
            "✅ AI context files generated successfully",
        ));

    let rules = fs::read_to_string(dir.path().join(".cursorrules")).unwrap();
    assert!(rules.contains("# From README.md:"));
    assert!(rules.contains("# From docs/guide.md:"));
    assert!(rules.contains("Test Project"));
    assert!(!rules.contains("non-existent.md"));
    assert!(!dir.path().join(".windsurf").exists());
}

#[test]
fn flags_override_without_touching_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "README.md", "# Editor Test");
    let config = r#"{ "sources": ["README.md"], "output": { "cursor": true, "claude": true } }"#;
    write(dir.path(), ".airul.json", config);

    airul(dir.path()).arg("--windsurf").assert().success();

    assert!(dir.path().join(".cursorrules").is_file());
    assert!(dir.path().join("CLAUDE.md").is_file());
    assert!(dir.path().join(".windsurf/rules/context.md").is_file());
    assert_eq!(
        fs::read_to_string(dir.path().join(".airul.json")).unwrap(),
        config
    );
}

#[test]
fn json_output_reports_statuses() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.md", "alpha");
    write(dir.path(), "empty.md", "   ");

    let output = airul(dir.path())
        .args(["--files", "a.md", "empty.md", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], Value::Bool(true));
    assert_eq!(json["processedFiles"]["a.md"], Value::Bool(true));
    assert_eq!(json["processedFiles"]["empty.md"], Value::Bool(false));
    assert_eq!(json["fileStatuses"]["empty.md"]["error"], "file is empty");
    assert_eq!(json["writtenTargets"], serde_json::json!(["cursor"]));
}

#[test]
fn nothing_to_include_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty.md", "");

    airul(dir.path())
        .args(["--files", "empty.md", "missing.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No rules were generated"));

    assert!(!dir.path().join(".cursorrules").exists());
}

#[test]
fn disabling_every_target_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "README.md", "content");

    airul(dir.path()).arg("--no-cursor").assert().code(1);
    assert!(!dir.path().join(".cursorrules").exists());
}

#[test]
fn malformed_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), ".airul.json", "{ not json");

    airul(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse"));
}
