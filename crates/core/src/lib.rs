//! Oldest-first disk space reclamation.
//!
//! Keeps a minimum amount of free space on the device hosting one or more
//! directories by deleting their oldest files (by modification time):
//!
//! - [`validator`] -- reduces candidate paths to a same-device [`DirectorySet`].
//! - [`scanner`] -- recursive, deduplicated inventory of regular files.
//! - [`reclamation`] -- the delete-oldest-then-recheck loop.
//!
//! Platform access goes through [`DeviceProbe`], [`SpaceProbe`] and
//! [`FileRemover`] so every step can be exercised without real devices.
//! Progress is reported as [`CleanupEvent`]s; the crate itself never prints.

pub mod device;
pub mod error;
pub mod events;
pub mod reclamation;
pub mod scanner;
pub mod space;
pub mod validator;

use std::path::Path;

pub use device::{DeviceId, DeviceProbe, MetadataDeviceProbe};
pub use error::{CleanupError, CleanupResult};
pub use events::{CleanupEvent, EventSink, NoopEvents, TracingEvents};
pub use reclamation::types::{
    DeletionFailure, DeletionPolicy, Outcome, ReclaimConfig, ReclaimReport,
};
pub use reclamation::{reclaim, FileRemover, Reclaimer, StdRemover};
pub use scanner::{scan, FileEntry, Inventory};
pub use space::{SpaceProbe, StatvfsProbe};
pub use validator::{validate, DirectorySet};

/// Validate `paths` and reclaim space on their device using the real
/// filesystem.
pub fn cleanup<P, E>(paths: &[P], config: &ReclaimConfig, events: &mut E) -> CleanupResult<ReclaimReport>
where
    P: AsRef<Path>,
    E: EventSink + ?Sized,
{
    let dirs = validate(paths, &MetadataDeviceProbe, events)?;
    reclaim(&dirs, config, events)
}
