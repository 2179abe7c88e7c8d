// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! End-to-end tests for the `cg` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A `cg` command isolated from any config file on the host.
fn cg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cg").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("CG_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn lint_accepts_valid_message() {
    let tmp = TempDir::new().unwrap();

    cg(tmp.path())
        .args(["lint", "feat(core): add parser\n\nParse headers into type, scope and subject."])
        .assert()
        .success();
}

#[test]
fn lint_flags_missing_scope() {
    let tmp = TempDir::new().unwrap();

    cg(tmp.path())
        .args(["lint", "feat: add x"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("scope-empty"))
        .stdout(predicate::str::contains("Scope is required"))
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn lint_reads_stdin() {
    let tmp = TempDir::new().unwrap();

    cg(tmp.path())
        .arg("lint")
        .write_stdin("fix(db): Close pool.\n\nThe pool leaked connections.\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("subject-case"))
        .stdout(predicate::str::contains("subject-full-stop"));
}

#[test]
fn lint_reads_file_and_strips_comments() {
    let tmp = TempDir::new().unwrap();
    let msg = tmp.path().join("COMMIT_EDITMSG");
    fs::write(
        &msg,
        "chore(deps): bump serde\n\nPicks up the derive fix.\n\
         # Please enter the commit message for your changes.\n\
         # ------------------------ >8 ------------------------\n\
         diff --git a/Cargo.toml b/Cargo.toml\n",
    )
    .unwrap();

    cg(tmp.path())
        .args(["lint", "--file"])
        .arg(&msg)
        .assert()
        .success();
}

#[test]
fn lint_json_output() {
    let tmp = TempDir::new().unwrap();

    let output = cg(tmp.path())
        .args(["--format", "json", "lint", "docs(readme): fix typo"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], false);
    let codes: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["type-enum"]);
}

#[test]
fn lint_skips_merge_commits() {
    let tmp = TempDir::new().unwrap();

    cg(tmp.path())
        .args(["lint", "Merge branch 'main' into feature/x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));
}

#[test]
fn lint_empty_message() {
    let tmp = TempDir::new().unwrap();

    cg(tmp.path())
        .arg("lint")
        .write_stdin("\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Commit message cannot be empty"));
}

#[test]
fn override_file_downgrades_rule() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cg.toml"),
        "[rules]\nscope-empty = [1, \"never\"]\n",
    )
    .unwrap();

    cg(tmp.path())
        .args(["lint", "fix: patch parser\n\nHandle trailing commas."])
        .assert()
        .success()
        .stdout(predicate::str::contains("scope-empty"));

    cg(tmp.path())
        .args(["lint", "--strict", "fix: patch parser\n\nHandle trailing commas."])
        .assert()
        .failure();
}

#[test]
fn config_env_var_is_used() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("custom.json");
    fs::write(
        &path,
        r#"{ "customRules": { "messages": { "headerTooLong": "{length} > {max}" } } }"#,
    )
    .unwrap();

    let header = format!("feat(core): {}", "a".repeat(70));
    cg(tmp.path())
        .env("CG_CONFIG", &path)
        .arg("lint")
        .arg(format!("{}\n\nBody.", header))
        .assert()
        .failure()
        .stdout(predicate::str::contains("82 > 72"));
}

#[test]
fn invalid_override_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cg.toml"),
        "[rules]\nheader-max-length = [2, \"always\", \"long\"]\n",
    )
    .unwrap();

    cg(tmp.path())
        .args(["lint", "feat(core): add x\n\nBody."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("header-max-length"));
}

#[test]
fn config_prints_builtin_rules() {
    let tmp = TempDir::new().unwrap();

    let output = cg(tmp.path()).args(["config", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["rules"]["header-max-length"][2], 72);
    assert_eq!(json["rules"]["scope-empty"][0], 2);
    assert_eq!(json["customRules"]["footerCountsAsBody"], true);

    cg(tmp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[customRules.messages]"));
}

#[test]
fn init_writes_example_config() {
    let tmp = TempDir::new().unwrap();

    cg(tmp.path()).arg("init").assert().success();
    let written = fs::read_to_string(tmp.path().join("cg.toml")).unwrap();
    assert!(written.contains("body-leading-blank"));

    cg(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cg(tmp.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn check_lints_commit_range() {
    let tmp = TempDir::new().unwrap();
    {
        let repo = git2::Repository::init(tmp.path()).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        for message in [
            "chore(repo): initial commit\n\nSet up the repository.",
            "feat: add x",
            "fix(core): patch parser\n\nHandle trailing commas.",
        ] {
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
            let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
            repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
                .unwrap();
        }
    }

    cg(tmp.path())
        .args(["check", "HEAD"])
        .assert()
        .success();

    cg(tmp.path())
        .args(["check", "HEAD~2..HEAD"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("feat: add x"))
        .stdout(predicate::str::contains("scope-empty"));
}

#[test]
fn version_command() {
    let tmp = TempDir::new().unwrap();

    cg(tmp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cg "));
}
