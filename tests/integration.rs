//! Integration tests for docker-launcher.
//!
//! These tests run whole requests through `LauncherConfig::prepare` with real
//! indirection files.

use docker_launcher::{
    FlagRule, LaunchRequest, LauncherConfig, PrefixMapping, Violation, CACHE_ROOT,
    WORKSPACE_ROOT,
};
use std::ffi::OsString;
use std::path::Path;
use tempfile::TempDir;

const IMAGE: &str = "helium-build/build-env:abc-1";

/// Production flags and roots, with indirection files under `tmp`.
fn launcher(tmp: &TempDir, workspace: &str, cache: &str) -> LauncherConfig {
    let ws = tmp.path().join("workspace");
    let cache_file = tmp.path().join("cache");
    std::fs::write(&ws, workspace).unwrap();
    std::fs::write(&cache_file, cache).unwrap();

    LauncherConfig::builder()
        .flag(FlagRule::switch("--rm"))
        .flag(FlagRule::switch("-it"))
        .flag(FlagRule::exact("--network", "none"))
        .flag(FlagRule::any("--hostname"))
        .flag(FlagRule::any("-e"))
        .flag(FlagRule::mount("-v"))
        .mapping(PrefixMapping::new(WORKSPACE_ROOT, ws))
        .mapping(PrefixMapping::new(CACHE_ROOT, cache_file))
        .build()
        .expect("valid config")
}

fn os(v: &[&str]) -> Vec<OsString> {
    v.iter().map(OsString::from).collect()
}

#[test]
fn test_scenario_workspace_mount_rewritten() {
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/real/ws", "/real/cache");

    let request = LaunchRequest::new(["run", "--rm", "-it", "-v", "/workspace/foo:/data", IMAGE]);
    let prepared = config.prepare(request).unwrap();

    assert_eq!(prepared.runtime(), Path::new("/usr/bin/docker"));
    assert_eq!(
        prepared.argv(),
        os(&["docker", "run", "--rm", "-it", "-v", "/real/ws/foo:/data", IMAGE])
    );
}

#[test]
fn test_scenario_etc_passwd_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/real/ws", "/real/cache");

    let request = LaunchRequest::new(["run", "-v", "/etc/passwd:/data", IMAGE]);
    assert!(matches!(
        config.prepare(request),
        Err(Violation::MountPrefix { spec }) if spec == "/etc/passwd:/data"
    ));
}

#[test]
fn test_scenario_bridge_network_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/real/ws", "/real/cache");

    let request = LaunchRequest::new(["run", "--network", "bridge", IMAGE]);
    assert!(matches!(
        config.prepare(request),
        Err(Violation::ValueNotAllowed { expected, .. }) if expected == "none"
    ));
}

#[test]
fn test_scenario_uppercase_tag_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/real/ws", "/real/cache");

    let request = LaunchRequest::new(["run", "helium-build/build-env:ABC"]);
    assert!(config.prepare(request).is_err());
}

#[test]
fn test_cache_mount_read_only() {
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/real/ws", "/var/lib/helium/cache");

    let request = LaunchRequest::new(["run", "-v", "/helium/cache/nuget:/root/.nuget:ro", IMAGE]);
    let prepared = config.prepare(request).unwrap();

    assert_eq!(
        prepared.args(),
        os(&["run", "-v", "/var/lib/helium/cache/nuget:/root/.nuget:ro", IMAGE])
    );
}

#[test]
fn test_full_agent_invocation() {
    // Shape of the build agent's request
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/srv/helium/ws-17", "/srv/helium/cache");

    let request = LaunchRequest::new([
        "run",
        "--rm",
        "--network",
        "none",
        "--hostname",
        "helium-build-env",
        "-v",
        "/workspace/sources:/sources:ro",
        "-v",
        "/helium/cache/sdks:/sdks",
        "-e",
        "HELIUM_BUILD=1",
        "helium-build/build-env:debian-buster-20190708",
        "/bin/sh",
        "-c",
        "make && make test",
    ]);
    let prepared = config.prepare(request).unwrap();

    assert_eq!(
        prepared.args(),
        os(&[
            "run",
            "--rm",
            "--network",
            "none",
            "--hostname",
            "helium-build-env",
            "-v",
            "/srv/helium/ws-17/sources:/sources:ro",
            "-v",
            "/srv/helium/cache/sdks:/sdks",
            "-e",
            "HELIUM_BUILD=1",
            "helium-build/build-env:debian-buster-20190708",
            "/bin/sh",
            "-c",
            "make && make test",
        ])
    );
}

#[test]
fn test_command_after_image_is_not_validated() {
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/real/ws", "/real/cache");

    let tail = ["--privileged", "-v", "/etc:/host-etc", "--network", "host"];
    let mut argv = vec!["run", IMAGE];
    argv.extend(tail);

    let prepared = config.prepare(LaunchRequest::new(argv.clone())).unwrap();
    assert_eq!(prepared.args(), os(&argv));
}

#[test]
fn test_missing_indirection_file_rejects_request() {
    let tmp = TempDir::new().unwrap();
    let config = LauncherConfig::builder()
        .flag(FlagRule::mount("-v"))
        .mapping(PrefixMapping::new(WORKSPACE_ROOT, tmp.path().join("absent")))
        .build()
        .unwrap();

    let request = LaunchRequest::new(["run", "-v", "/workspace/foo:/data", IMAGE]);
    assert!(matches!(
        config.prepare(request),
        Err(Violation::IndirectionOpen { .. })
    ));
}

#[test]
fn test_missing_image_after_valid_flags() {
    let tmp = TempDir::new().unwrap();
    let config = launcher(&tmp, "/real/ws", "/real/cache");

    let request = LaunchRequest::new(["run", "--rm", "-v", "/workspace/a:/a"]);
    assert!(matches!(
        config.prepare(request),
        Err(Violation::ImageNotSpecified)
    ));
}
