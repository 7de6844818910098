// tests/install_pipeline.rs

//! End-to-end install runs against an in-memory release host.

mod common;

use common::{asset_name, engine_zip, temp_layout, FakeHost, DOWNLOAD_URL};
use godot_installer::hash::{hash_bytes, HashAlgorithm};
use godot_installer::{
    ActiveLink, Architecture, Error, InstallOutcome, Layout, Pipeline, ReleaseVersion, RunContext,
    VersionStore,
};
use std::fs;
use std::io::{Cursor, Write};
use std::time::{Duration, Instant};

fn v(s: &str) -> ReleaseVersion {
    ReleaseVersion::parse(s).unwrap()
}

fn run(
    host: &FakeHost,
    layout: &Layout,
    version: Option<&str>,
    arch: Architecture,
) -> godot_installer::Result<InstallOutcome> {
    let index = host.index();
    let mut ctx = RunContext::acquire(layout.clone())?;
    Pipeline::new(&index, host)
        .with_retry_delay(Duration::ZERO)
        .run(&mut ctx, version, arch)
}

#[test]
fn test_fresh_install_links_executable() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64, Architecture::Arm64]);

    let outcome = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap();

    assert!(outcome.fresh);
    assert_eq!(outcome.installed.version, v("4.3"));
    assert_eq!(outcome.installed.dir, layout.version_dir(&v("4.3")));
    assert_eq!(
        outcome.installed.executable.file_name().unwrap(),
        "Godot_v4.3-stable_linux.x86_64"
    );

    let link = ActiveLink::new(layout.active_link());
    assert_eq!(link.target().unwrap(), outcome.installed.executable);
    assert_eq!(
        fs::read_to_string(layout.active_link()).unwrap(),
        "ELF godot 4.3 x86_64"
    );
}

#[test]
fn test_second_install_skips_download_and_verification() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64]);

    let first = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap();
    assert_eq!(host.count(".zip"), 1);
    assert_eq!(host.count("SHA512-SUMS.txt"), 1);

    let second = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap();
    assert!(!second.fresh);
    assert_eq!(second.installed, first.installed);
    assert_eq!(host.count(".zip"), 1);
    assert_eq!(host.count("SHA512-SUMS.txt"), 1);

    // One version directory holding one executable, one link
    let entries: Vec<_> = fs::read_dir(layout.versions_root()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let bin_entries: Vec<_> = fs::read_dir(&layout.bin_dir).unwrap().collect();
    assert_eq!(bin_entries.len(), 1);
    assert_eq!(
        ActiveLink::new(layout.active_link()).target().unwrap(),
        first.installed.executable
    );
}

#[test]
fn test_latest_release_used_without_request() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.4.1", &[Architecture::X86_64]);

    let outcome = run(&host, &layout, None, Architecture::X86_64).unwrap();

    assert_eq!(outcome.installed.version, v("4.4.1"));
    assert_eq!(host.count("/latest"), 1);
}

#[test]
fn test_invalid_version_makes_no_requests() {
    let (_temp, layout) = temp_layout();
    let host = FakeHost::new();

    let err = run(&host, &layout, Some("4.x"), Architecture::X86_64).unwrap_err();

    assert!(matches!(err, Error::InvalidVersionFormat(ref s) if s == "4.x"));
    assert_eq!(host.count(""), 0);
}

#[test]
fn test_checksum_mismatch_installs_nothing() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64]);
    // Swap the archive after the manifest was computed
    host.serve(
        format!("{DOWNLOAD_URL}/4.3-stable/{}", asset_name("4.3", Architecture::X86_64)),
        engine_zip("4.3-tampered", Architecture::X86_64),
    );

    let err = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap_err();

    assert!(matches!(err, Error::ChecksumMismatch { .. }));
    assert!(!layout.version_dir(&v("4.3")).exists());
    assert!(!ActiveLink::new(layout.active_link()).exists());
}

#[test]
fn test_missing_manifest_entry_fails() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64]);
    host.serve(
        format!("{DOWNLOAD_URL}/4.3-stable/SHA512-SUMS.txt"),
        "abc123  Godot_v4.3-stable_export_templates.tpz\n",
    );

    let err = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap_err();

    assert!(matches!(err, Error::ChecksumNotFound(_)));
    assert!(!layout.version_dir(&v("4.3")).exists());
}

#[test]
fn test_arm32_falls_back_to_arm64() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::Arm64]);

    let outcome = run(&host, &layout, Some("4.3"), Architecture::Arm32).unwrap();

    assert_eq!(
        outcome.installed.executable.file_name().unwrap(),
        "Godot_v4.3-stable_linux.arm64"
    );
}

#[test]
fn test_x86_64_has_no_fallback() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::Arm64]);

    let err = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap_err();

    assert!(matches!(
        err,
        Error::AssetNotFound { ref version, ref arch } if version == "4.3" && arch == "x86_64"
    ));
    assert_eq!(host.count(".zip"), 0);
}

#[test]
fn test_download_gives_up_after_three_attempts() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64]);
    host.fail(format!(
        "{DOWNLOAD_URL}/4.3-stable/{}",
        asset_name("4.3", Architecture::X86_64)
    ));

    let err = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap_err();

    assert!(matches!(err, Error::DownloadFailed { attempts: 3, .. }));
    assert_eq!(host.count(".zip"), 3);
    assert_eq!(host.count("SHA512-SUMS.txt"), 0);
}

#[test]
fn test_archive_without_payload_leaves_no_version_dir() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64]);

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("README.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"nothing to run here").unwrap();
    let zip = writer.finish().unwrap().into_inner();

    let name = asset_name("4.3", Architecture::X86_64);
    host.serve(
        format!("{DOWNLOAD_URL}/4.3-stable/SHA512-SUMS.txt"),
        format!("{}  {}\n", hash_bytes(HashAlgorithm::Sha512, &zip), name),
    );
    host.serve(format!("{DOWNLOAD_URL}/4.3-stable/{name}"), zip);

    let err = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap_err();

    assert!(matches!(err, Error::PayloadNotFound(_)));
    assert!(!layout.version_dir(&v("4.3")).exists());
    assert!(!ActiveLink::new(layout.active_link()).exists());
}

#[test]
fn test_installing_another_version_moves_the_link_and_clean_keeps_it() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3.0", &[Architecture::X86_64]);
    host.publish("4.4.0", &[Architecture::X86_64]);

    run(&host, &layout, Some("4.3.0"), Architecture::X86_64).unwrap();
    let newer = run(&host, &layout, Some("4.4.0"), Architecture::X86_64).unwrap();

    let store = VersionStore::new(&layout);
    assert_eq!(store.installed_versions().unwrap(), vec![v("4.3.0"), v("4.4.0")]);
    assert_eq!(store.active_version(), Some(v("4.4.0")));

    let removed = store.clean().unwrap();
    assert_eq!(removed, vec![v("4.3.0")]);
    assert_eq!(store.installed_versions().unwrap(), vec![v("4.4.0")]);
    assert_eq!(
        ActiveLink::new(layout.active_link()).target().unwrap(),
        newer.installed.executable
    );
}

#[test]
fn test_uninstall_all_after_install() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64]);
    run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap();

    VersionStore::new(&layout).uninstall(None).unwrap();

    assert!(!layout.versions_root().exists());
    assert!(!ActiveLink::new(layout.active_link()).exists());
}

#[test]
fn test_concurrent_run_refused_immediately() {
    let (_temp, layout) = temp_layout();
    let mut host = FakeHost::new();
    host.publish("4.3", &[Architecture::X86_64]);

    let _holder = RunContext::acquire(layout.clone()).unwrap();

    let started = Instant::now();
    let err = run(&host, &layout, Some("4.3"), Architecture::X86_64).unwrap_err();

    assert!(matches!(err, Error::InstanceAlreadyRunning(_)));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(host.count(""), 0);
}
