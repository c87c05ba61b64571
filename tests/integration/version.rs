//! The `version` command.

use crate::common::TestEnvironment;
use std::fs;

#[test]
fn test_version_not_installed_exits_zero() {
    let env = TestEnvironment::new().unwrap();

    let output = env.run_lpm(&["version"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("Windsurf is not installed"), "stdout: {}", output.stdout);
}

#[test]
fn test_version_shows_details() {
    let env = TestEnvironment::new().unwrap();
    env.publish("1.3.4").unwrap();
    env.run_lpm(&["install"]).unwrap().assert_success();

    let output = env.run_lpm(&["version"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("Windsurf Version Information"));
    assert!(output.stdout.contains("Windsurf: 1.3.4"));
    assert!(output.stdout.contains("Codeium: 1.3.4-codeium"));
    assert!(output.stdout.contains("VS Core: 1.94.0"));
}

#[test]
fn test_version_missing_metadata() {
    let env = TestEnvironment::new().unwrap();
    fs::create_dir_all(env.install_dir()).unwrap();

    let output = env.run_lpm(&["version"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("product.json is missing"), "stdout: {}", output.stdout);
}
