//! Script wrappers through the CLI.

use crate::common::TestEnvironment;
use httpmock::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;

#[test]
fn test_scripts_list_shows_builtin_entries() {
    let env = TestEnvironment::new().unwrap();

    let output = env.run_lpm(&["scripts", "list"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("git-bare-clone (git_bare_clone.py)"));
    assert!(output.stdout.contains("install-windsurf (install_windsurf.py)"));
}

#[test]
fn test_scripts_install_writes_wrapper() {
    let env = TestEnvironment::new().unwrap();

    let output = env.run_lpm(&["scripts", "install", "git-bare-clone"]).unwrap();
    output.assert_success();

    let wrapper = env.bin_dir().join("git-bare-clone");
    let content = fs::read_to_string(&wrapper).unwrap();
    assert!(content.contains(&format!(
        "exec uv run --quiet {} \"$@\"",
        env.server.url("/scripts/git_bare_clone.py")
    )));
    assert_eq!(fs::metadata(&wrapper).unwrap().permissions().mode() & 0o777, 0o755);
    assert!(output.stdout.contains("Run it with: git-bare-clone"));
}

#[test]
fn test_scripts_install_download() {
    let env = TestEnvironment::new().unwrap();
    let script = env.server.mock(|when, then| {
        when.method(GET).path("/scripts/install_windsurf.py");
        then.status(200).body("print('installing')\n");
    });

    let output = env.run_lpm(&["scripts", "install", "install-windsurf", "--download"]).unwrap();
    output.assert_success();

    script.assert();
    assert_eq!(
        fs::read_to_string(env.bin_dir().join("install-windsurf")).unwrap(),
        "print('installing')\n"
    );
}

#[test]
fn test_scripts_install_unknown_suggests() {
    let env = TestEnvironment::new().unwrap();

    let output = env.run_lpm(&["scripts", "install", "git-bare-clon"]).unwrap();
    output.assert_failure();

    assert!(output.stderr.contains("Unknown script name 'git-bare-clon'"), "stderr: {}", output.stderr);
    assert!(output.stderr.contains("git-bare-clone"));
    assert!(!env.bin_dir().join("git-bare-clon").exists());
}
