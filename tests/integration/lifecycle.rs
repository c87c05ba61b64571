//! Install, update and uninstall through the CLI.

use crate::common::TestEnvironment;
use std::fs;
use std::os::unix::fs::PermissionsExt;

#[test]
fn test_install_provisions_everything() {
    let env = TestEnvironment::new().unwrap();
    let (api, download) = env.publish("1.2.0").unwrap();

    let output = env.run_lpm(&["install"]).unwrap();
    output.assert_success();

    api.assert();
    download.assert();
    assert!(output.stdout.contains("Windsurf 1.2.0 installed to"), "stdout: {}", output.stdout);

    let binary = env.install_dir().join("windsurf");
    assert!(binary.is_file());
    assert!(env.install_dir().join("resources/app/product.json").is_file());

    let launcher = env.bin_dir().join("windsurf");
    let launcher_script = fs::read_to_string(&launcher).unwrap();
    assert!(launcher_script.starts_with("#!/bin/sh"));
    assert!(launcher_script.contains(&format!("exec \"{}\" \"$@\"", binary.display())));
    assert_eq!(fs::metadata(&launcher).unwrap().permissions().mode() & 0o777, 0o755);

    let update_script = fs::read_to_string(env.bin_dir().join("update-windsurf")).unwrap();
    assert!(update_script.contains(&format!("--config \"{}\"", env.config_path.display())));
    assert!(update_script.contains("--package \"windsurf\" update"));

    let desktop = fs::read_to_string(env.desktop_entry()).unwrap();
    assert!(desktop.contains("Name=Windsurf"));
    assert!(desktop.contains(&format!("Exec={} %F", launcher.display())));

    assert!(env.systemd_dir().join("windsurf-update.service").is_file());
    let timer = fs::read_to_string(env.systemd_dir().join("windsurf-update.timer")).unwrap();
    assert!(timer.contains("OnCalendar=weekly"));
}

#[test]
fn test_install_twice_requires_force() {
    let env = TestEnvironment::new().unwrap();
    env.publish("1.0.0").unwrap();
    env.run_lpm(&["install"]).unwrap().assert_success();

    let output = env.run_lpm(&["install"]).unwrap();
    output.assert_failure();
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("already installed"), "stderr: {}", output.stderr);

    env.run_lpm(&["install", "--force"]).unwrap().assert_success();
}

#[test]
fn test_skip_auto_update_writes_no_units() {
    let env = TestEnvironment::new().unwrap();
    env.publish("1.0.0").unwrap();

    let output = env.run_lpm(&["install", "--skip-auto-update"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("Automatic updates not enabled"));
    assert!(!env.systemd_dir().join("windsurf-update.timer").exists());
    assert!(env.bin_dir().join("update-windsurf").exists());
}

#[test]
fn test_failing_systemctl_still_installs() {
    let env = TestEnvironment::with_systemctl("false").unwrap();
    env.publish("1.0.0").unwrap();

    let output = env.run_lpm(&["install"]).unwrap();
    output.assert_success();

    assert!(output.stderr.contains("warning: scheduled update"), "stderr: {}", output.stderr);
    assert!(env.install_dir().join("windsurf").exists());
}

#[test]
fn test_update_to_newer_release() {
    let env = TestEnvironment::new().unwrap();
    let (mut api, mut download) = env.publish("1.0.0").unwrap();
    env.run_lpm(&["install"]).unwrap().assert_success();
    api.delete();
    download.delete();

    env.publish("1.1.0").unwrap();
    let output = env.run_lpm(&["update"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("updated from 1.0.0 to 1.1.0"), "stdout: {}", output.stdout);
    assert!(env.install_dir().join("lib/release-1.1.0.txt").exists());
    assert!(!env.install_dir().join("lib/release-1.0.0.txt").exists());
}

#[test]
fn test_update_when_current_downloads_nothing() {
    let env = TestEnvironment::new().unwrap();
    let (_api, download) = env.publish("1.0.0").unwrap();
    env.run_lpm(&["install"]).unwrap().assert_success();

    let output = env.run_lpm(&["update"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("already up to date (1.0.0)"), "stdout: {}", output.stdout);
    download.assert_hits(1);
}

#[test]
fn test_update_not_installed_fails() {
    let env = TestEnvironment::new().unwrap();
    let (api, _download) = env.publish("1.0.0").unwrap();

    let output = env.run_lpm(&["update"]).unwrap();
    output.assert_failure();

    assert!(output.stderr.contains("is not installed"), "stderr: {}", output.stderr);
    api.assert_hits(0);
}

#[test]
fn test_uninstall_removes_everything() {
    let env = TestEnvironment::new().unwrap();
    env.publish("1.0.0").unwrap();
    env.run_lpm(&["install"]).unwrap().assert_success();
    let user_config = env.home.join(".config/windsurf");
    fs::create_dir_all(&user_config).unwrap();

    let output = env.run_lpm(&["uninstall"]).unwrap();
    output.assert_success();

    assert!(output.stdout.contains("Windsurf uninstalled"), "stdout: {}", output.stdout);
    assert!(!env.install_dir().exists());
    assert!(!env.bin_dir().join("windsurf").exists());
    assert!(!env.bin_dir().join("update-windsurf").exists());
    assert!(!env.desktop_entry().exists());
    assert!(!env.systemd_dir().join("windsurf-update.service").exists());
    assert!(!env.systemd_dir().join("windsurf-update.timer").exists());
    assert!(!user_config.exists());

    // A second uninstall has nothing left to do
    env.run_lpm(&["uninstall"]).unwrap().assert_success();
}

#[test]
fn test_uninstall_keep_config() {
    let env = TestEnvironment::new().unwrap();
    env.publish("1.0.0").unwrap();
    env.run_lpm(&["install"]).unwrap().assert_success();
    let user_config = env.home.join(".config/windsurf");
    fs::create_dir_all(&user_config).unwrap();

    env.run_lpm(&["uninstall", "--keep-config"]).unwrap().assert_success();

    assert!(!env.install_dir().exists());
    assert!(user_config.exists());
}

#[test]
fn test_config_path_from_environment_reaches_update_script() {
    let env = TestEnvironment::new().unwrap();
    let (api, _download) = env.publish("1.2.0").unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_lpm"))
        .args(["--no-progress", "install"])
        .current_dir(&env.home)
        .env("HOME", &env.home)
        .env("NO_COLOR", "1")
        .env("LPM_CONFIG_PATH", &env.config_path)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(!stderr.contains("Downloading"), "stderr: {stderr}");

    api.assert();
    let update_script = fs::read_to_string(env.bin_dir().join("update-windsurf")).unwrap();
    assert!(update_script.contains(&format!("--config \"{}\"", env.config_path.display())));
}
