//! Directory validation.
//!
//! Turns caller-supplied paths into a [`DirectorySet`]: existing
//! directories that all live on one storage device.

use std::path::{Path, PathBuf};

use crate::device::{DeviceId, DeviceProbe};
use crate::error::{CleanupError, CleanupResult};
use crate::events::{CleanupEvent, EventSink};

/// Validated, ordered, same-device directories for one run.
///
/// Only [`validate`] builds one, so a `DirectorySet` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySet {
    paths: Vec<PathBuf>,
}

impl DirectorySet {
    /// The first surviving directory. Free space is queried here.
    pub fn primary(&self) -> &Path {
        &self.paths[0]
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Filter `paths` down to existing same-device directories.
///
/// Missing paths and non-directories are skipped with an event. Fails with
/// [`CleanupError::NoExistingDirectory`] when nothing survives and with
/// [`CleanupError::DifferentDevices`] on the first device mismatch.
pub fn validate<P, D, E>(paths: &[P], devices: &D, events: &mut E) -> CleanupResult<DirectorySet>
where
    P: AsRef<Path>,
    D: DeviceProbe + ?Sized,
    E: EventSink + ?Sized,
{
    let mut survivors = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            events.emit(CleanupEvent::SkippedMissing {
                path: path.to_path_buf(),
            });
            continue;
        }
        if !path.is_dir() {
            events.emit(CleanupEvent::SkippedNotDirectory {
                path: path.to_path_buf(),
            });
            continue;
        }
        survivors.push(path.to_path_buf());
    }

    let Some(first) = survivors.first() else {
        events.emit(CleanupEvent::NoExistingDirectory);
        return Err(CleanupError::NoExistingDirectory);
    };

    let device = device_of(devices, first)?;
    for other in &survivors[1..] {
        if device_of(devices, other)? != device {
            events.emit(CleanupEvent::DeviceMismatch {
                first: first.clone(),
                other: other.clone(),
            });
            return Err(CleanupError::DifferentDevices {
                first: first.clone(),
                other: other.clone(),
            });
        }
    }

    tracing::debug!(count = survivors.len(), %device, "Directories validated");

    Ok(DirectorySet { paths: survivors })
}

fn device_of<D: DeviceProbe + ?Sized>(devices: &D, path: &Path) -> CleanupResult<DeviceId> {
    devices
        .device_id_of(path)
        .map_err(|source| CleanupError::DeviceQuery {
            path: path.to_path_buf(),
            source,
        })
}
