//! Status events emitted during a cleanup run.
//!
//! The core never prints. Every informational message (skipped paths,
//! validation aborts, deletion progress, free-space readings) is a
//! [`CleanupEvent`] handed to an [`EventSink`]. The CLI forwards them to the
//! log with [`TracingEvents`]; tests collect them into a `Vec`.

use std::path::PathBuf;

use serde::Serialize;

/// A single progress or status notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CleanupEvent {
    /// A candidate path does not exist and was dropped.
    SkippedMissing { path: PathBuf },
    /// A candidate path exists but is not a directory and was dropped.
    SkippedNotDirectory { path: PathBuf },
    /// No candidate path survived validation.
    NoExistingDirectory,
    /// Two directories live on different devices.
    DeviceMismatch { first: PathBuf, other: PathBuf },
    /// The run's target, announced before any disk access.
    Requested { threshold_mb: i64, directory: PathBuf },
    /// The threshold was already met; nothing was scanned.
    EnoughSpace { available_mb: i64 },
    /// About to delete a file.
    Removing { path: PathBuf },
    /// Dry run: this file would have been deleted.
    WouldRemove { path: PathBuf, size_bytes: u64 },
    /// Free space after a deletion.
    SpaceNow { available_mb: i64 },
    /// A delete failed and the run is continuing with the next file.
    DeletionFailed { path: PathBuf, reason: String },
    /// Every file was consumed and the threshold is still not met.
    NotEnoughSpace { available_mb: i64 },
}

/// Receives [`CleanupEvent`]s as they happen.
pub trait EventSink {
    fn emit(&mut self, event: CleanupEvent);
}

impl EventSink for Vec<CleanupEvent> {
    fn emit(&mut self, event: CleanupEvent) {
        self.push(event);
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl EventSink for NoopEvents {
    fn emit(&mut self, _event: CleanupEvent) {}
}

/// Writes each event as a human-readable `tracing` line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn emit(&mut self, event: CleanupEvent) {
        match event {
            CleanupEvent::SkippedMissing { path } => {
                tracing::info!(path = %path.display(), "Directory does not exist, ignoring");
            }
            CleanupEvent::SkippedNotDirectory { path } => {
                tracing::info!(path = %path.display(), "Path is not a directory, ignoring");
            }
            CleanupEvent::NoExistingDirectory => {
                tracing::error!("No existing directory given");
            }
            CleanupEvent::DeviceMismatch { first, other } => {
                tracing::error!(
                    first = %first.display(),
                    other = %other.display(),
                    "Directories are not on the same device",
                );
            }
            CleanupEvent::Requested {
                threshold_mb,
                directory,
            } => {
                tracing::info!(
                    threshold_mb,
                    directory = %directory.display(),
                    "Requested {threshold_mb} MB available",
                );
            }
            CleanupEvent::EnoughSpace { available_mb } => {
                tracing::info!(available_mb, "There is enough space available, no cleanup necessary");
            }
            CleanupEvent::Removing { path } => {
                tracing::info!(path = %path.display(), "Removing file");
            }
            CleanupEvent::WouldRemove { path, size_bytes } => {
                tracing::info!(
                    path = %path.display(),
                    size_bytes,
                    "Would remove file (dry run)",
                );
            }
            CleanupEvent::SpaceNow { available_mb } => {
                tracing::info!(available_mb, "Space now available: {available_mb} MB");
            }
            CleanupEvent::DeletionFailed { path, reason } => {
                tracing::warn!(path = %path.display(), reason = %reason, "Failed to remove file, continuing");
            }
            CleanupEvent::NotEnoughSpace { available_mb } => {
                tracing::warn!(
                    available_mb,
                    "There is NOT enough space available and there are no more files to delete",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let json = serde_json::to_value(CleanupEvent::SpaceNow { available_mb: 42 })
            .expect("serialize event");
        assert_eq!(json["event"], "space_now");
        assert_eq!(json["available_mb"], 42);

        let json = serde_json::to_value(CleanupEvent::NoExistingDirectory).expect("serialize");
        assert_eq!(json["event"], "no_existing_directory");
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<CleanupEvent> = Vec::new();
        sink.emit(CleanupEvent::Removing {
            path: PathBuf::from("/a"),
        });
        sink.emit(CleanupEvent::SpaceNow { available_mb: 1 });
        assert_eq!(sink.len(), 2);
        assert!(matches!(sink[0], CleanupEvent::Removing { .. }));
    }
}
