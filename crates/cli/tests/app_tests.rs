//! Integration tests for the run driver.
//!
//! Platform collaborators are faked so results do not depend on the host
//! disk or on having several devices available.

use std::io;
use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use clap::Parser;
use spacekeeper_cli::app::{already_reported, execute, execute_with, report_json};
use spacekeeper_cli::cli::Cli;
use spacekeeper_cli::config::{RunConfig, Settings};
use spacekeeper_core::{
    CleanupError, CleanupEvent, DeviceId, DeviceProbe, MetadataDeviceProbe, Outcome, Reclaimer,
    SpaceProbe, StdRemover,
};

/// Free space that grows by 1 MB for every file missing from `watched`.
struct PerFileSpace {
    base: i64,
    watched: Vec<PathBuf>,
}

impl SpaceProbe for PerFileSpace {
    fn available_mb(&self, _path: &Path) -> io::Result<i64> {
        Ok(self.base + self.watched.iter().filter(|p| !p.exists()).count() as i64)
    }
}

/// Puts every directory named `other` on a second device.
struct SplitDevices;

impl DeviceProbe for SplitDevices {
    fn device_id_of(&self, path: &Path) -> io::Result<DeviceId> {
        let on_other = path.file_name().is_some_and(|name| name == "other");
        Ok(DeviceId(u64::from(on_other)))
    }
}

fn run_config(args: &[&str]) -> RunConfig {
    let cli = Cli::try_parse_from(std::iter::once("cleanup").chain(args.iter().copied()))
        .expect("parse");
    RunConfig::resolve(cli, Settings::default())
}

fn write_files(root: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = root.join(name);
            std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            std::fs::write(&path, b"recording").expect("write");
            path
        })
        .collect()
}

#[test]
fn cleans_until_threshold_and_reports() {
    let root = tempfile::tempdir().expect("temp dir");
    let files = write_files(root.path(), &["rec/a.ts", "rec/b.ts", "rec/c.ts"]);
    let dir = root.path().join("rec");
    let run = run_config(&["-s", "12", dir.to_str().expect("utf-8 path")]);
    let space = PerFileSpace {
        base: 10,
        watched: files.clone(),
    };
    let mut events: Vec<CleanupEvent> = Vec::new();

    let report = execute_with(
        &run,
        &MetadataDeviceProbe,
        Reclaimer::new(space, StdRemover),
        &mut events,
    )
    .expect("run");

    assert_eq!(report.outcome, Outcome::Reclaimed);
    assert_eq!(report.removed.len(), 2);
    assert_eq!(report.final_available_mb, 12);
    assert_eq!(files.iter().filter(|p| p.exists()).count(), 1);
}

#[test]
fn nonexistent_directory_fails_without_deleting() {
    let root = tempfile::tempdir().expect("temp dir");
    let files = write_files(root.path(), &["keep/a.ts"]);
    let missing = root.path().join("missing");
    let run = run_config(&["-s", "100", missing.to_str().expect("utf-8 path")]);

    let err = execute_with(
        &run,
        &MetadataDeviceProbe,
        Reclaimer::new(
            PerFileSpace {
                base: 0,
                watched: files.clone(),
            },
            StdRemover,
        ),
        &mut Vec::<CleanupEvent>::new(),
    )
    .expect_err("validation should fail");

    assert_matches!(
        err.downcast_ref::<CleanupError>(),
        Some(CleanupError::NoExistingDirectory)
    );
    assert!(already_reported(&err));
    assert!(files[0].exists());
}

#[test]
fn mixed_devices_fail_without_deleting() {
    let root = tempfile::tempdir().expect("temp dir");
    let files = write_files(root.path(), &["main/a.ts", "other/b.ts"]);
    let main = root.path().join("main");
    let other = root.path().join("other");
    let run = run_config(&[
        "-s",
        "100",
        main.to_str().expect("utf-8 path"),
        other.to_str().expect("utf-8 path"),
    ]);
    let mut events: Vec<CleanupEvent> = Vec::new();

    let err = execute_with(
        &run,
        &SplitDevices,
        Reclaimer::new(
            PerFileSpace {
                base: 0,
                watched: files.clone(),
            },
            StdRemover,
        ),
        &mut events,
    )
    .expect_err("validation should fail");

    assert_matches!(
        err.downcast_ref::<CleanupError>(),
        Some(CleanupError::DifferentDevices { .. })
    );
    assert!(files.iter().all(|p| p.exists()));
    assert_matches!(events.last(), Some(CleanupEvent::DeviceMismatch { .. }));
    assert!(already_reported(&err));
}

#[test]
fn dry_run_report_serializes_to_json() {
    let root = tempfile::tempdir().expect("temp dir");
    let files = write_files(root.path(), &["rec/a.ts"]);
    let dir = root.path().join("rec");
    let run = run_config(&["--dry-run", "--json", "-s", "5", dir.to_str().expect("utf-8 path")]);

    let report = execute_with(
        &run,
        &MetadataDeviceProbe,
        Reclaimer::new(
            PerFileSpace {
                base: 0,
                watched: files.clone(),
            },
            StdRemover,
        ),
        &mut Vec::<CleanupEvent>::new(),
    )
    .expect("run");

    assert!(files[0].exists());
    assert_eq!(report.outcome, Outcome::ExhaustedInsufficient);

    let json: serde_json::Value =
        serde_json::from_str(&report_json(&report).expect("json")).expect("valid json");
    assert_eq!(json["outcome"], "exhausted_insufficient");
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["removed"].as_array().map(Vec::len), Some(1));
}

#[test]
fn execute_on_real_disk_with_zero_threshold_deletes_nothing() {
    let root = tempfile::tempdir().expect("temp dir");
    let files = write_files(root.path(), &["rec/a.ts"]);
    let dir = root.path().join("rec");
    let run = run_config(&["-s", "0", dir.to_str().expect("utf-8 path")]);

    let report = execute(&run).expect("run");

    assert_eq!(report.outcome, Outcome::AlreadySatisfied);
    assert!(report.removed.is_empty());
    assert!(files[0].exists());
}

#[test]
fn execute_reports_missing_directory_through_events_only() {
    let root = tempfile::tempdir().expect("temp dir");
    let missing = root.path().join("missing");
    let run = run_config(&["-s", "0", missing.to_str().expect("utf-8 path")]);

    let err = execute(&run).expect_err("validation should fail");

    assert!(already_reported(&err));
}

#[test]
fn deletion_errors_are_not_reported_by_events() {
    let err = anyhow::Error::new(CleanupError::Deletion {
        path: PathBuf::from("/rec/a.ts"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
    })
    .context("Cleanup aborted");

    assert!(!already_reported(&err));
}
