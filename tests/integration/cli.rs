//! Help, version and argument errors of the `lpm` binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("lpm")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("install")
                .and(predicate::str::contains("uninstall"))
                .and(predicate::str::contains("bare-clone"))
                .and(predicate::str::contains("scripts")),
        );
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("lpm")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("lpm "));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    Command::cargo_bin("lpm")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_bare_clone_refuses_existing_git_entry() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join(".git"), "gitdir: ./elsewhere\n").unwrap();

    Command::cargo_bin("lpm")
        .unwrap()
        .current_dir(temp.path())
        .env("NO_COLOR", "1")
        .args(["bare-clone", "https://example.com/repo.git"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(".git"));

    assert!(!temp.path().join(".bare").exists());
}
