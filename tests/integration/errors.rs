//! Failing commands exit non-zero with a readable message.

use crate::common::{TestEnvironment, run_lpm_in};
use httpmock::prelude::*;

#[test]
fn test_server_error_leaves_nothing_behind() {
    let env = TestEnvironment::new().unwrap();
    env.server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(500);
    });

    let output = env.run_lpm(&["install"]).unwrap();
    output.assert_failure();

    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("error: Network error"), "stderr: {}", output.stderr);
    assert!(!env.install_dir().exists());
    assert!(!env.bin_dir().join("windsurf").exists());
}

#[test]
fn test_malformed_release_payload() {
    let env = TestEnvironment::new().unwrap();
    env.server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(200).body(r#"{"url": "https://example.com/a.tar.gz"}"#);
    });

    let output = env.run_lpm(&["install"]).unwrap();
    output.assert_failure();

    assert!(output.stderr.contains("Malformed response"), "stderr: {}", output.stderr);
    assert!(!env.install_dir().exists());
}

#[test]
fn test_corrupt_archive_is_extraction_error() {
    let env = TestEnvironment::new().unwrap();
    let url = env.server.url("/downloads/broken.tar.gz");
    env.server.mock(|when, then| {
        when.method(GET).path("/api/latest");
        then.status(200).json_body(serde_json::json!({ "windsurfVersion": "1.0.0", "url": url }));
    });
    env.server.mock(|when, then| {
        when.method(GET).path("/downloads/broken.tar.gz");
        then.status(200).body("this is not a tarball");
    });

    let output = env.run_lpm(&["install"]).unwrap();
    output.assert_failure();

    assert!(output.stderr.contains("Failed to extract archive"), "stderr: {}", output.stderr);
    assert!(!env.install_dir().exists());
}

#[test]
fn test_unknown_package() {
    let env = TestEnvironment::new().unwrap();

    let output = env.run_lpm(&["--package", "nosuch", "version"]).unwrap();
    output.assert_failure();

    assert!(output.stderr.contains("Unknown package 'nosuch'"), "stderr: {}", output.stderr);
}

#[test]
fn test_missing_explicit_config_fails() {
    let env = TestEnvironment::new().unwrap();
    let missing = env.temp.path().join("missing.toml");

    let output = run_lpm_in(&env.home, Some(&missing), &["version"]).unwrap();
    output.assert_failure();
}

#[test]
fn test_no_config_file_uses_defaults() {
    let env = TestEnvironment::new().unwrap();

    let output = run_lpm_in(&env.home, None, &["version"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("Windsurf is not installed"));
}
