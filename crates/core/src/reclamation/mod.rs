//! Space reclamation.
//!
//! Deletes the oldest files of a [`DirectorySet`] one at a time, re-reading
//! free space after each deletion, until the threshold is met or no files
//! are left. Each iteration consumes one scanned file, so a run performs at
//! most as many deletions as the scan found.

pub mod types;

use std::io;
use std::path::Path;

use crate::error::{CleanupError, CleanupResult};
use crate::events::{CleanupEvent, EventSink};
use crate::scanner;
use crate::space::{bytes_to_mb, SpaceProbe, StatvfsProbe};
use crate::validator::DirectorySet;

use types::{DeletionFailure, DeletionPolicy, Outcome, ReclaimConfig, ReclaimReport};

/// Removes a single file from disk.
pub trait FileRemover {
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`FileRemover`] backed by [`std::fs::remove_file`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdRemover;

impl FileRemover for StdRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

impl<T: FileRemover + ?Sized> FileRemover for &T {
    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }
}

/// Runs the reclamation loop against a free-space source and a remover.
#[derive(Debug, Clone)]
pub struct Reclaimer<S, R> {
    space: S,
    remover: R,
}

impl Default for Reclaimer<StatvfsProbe, StdRemover> {
    fn default() -> Self {
        Self::new(StatvfsProbe, StdRemover)
    }
}

impl<S: SpaceProbe, R: FileRemover> Reclaimer<S, R> {
    pub fn new(space: S, remover: R) -> Self {
        Self { space, remover }
    }

    /// Free space until `config.threshold_mb` is available on the device of
    /// `dirs`, or until every file below `dirs` has been removed.
    ///
    /// Nothing is scanned when the threshold is already met.
    pub fn run<E>(
        &self,
        dirs: &DirectorySet,
        config: &ReclaimConfig,
        events: &mut E,
    ) -> CleanupResult<ReclaimReport>
    where
        E: EventSink + ?Sized,
    {
        let target = dirs.primary();
        let threshold = config.threshold_mb;

        events.emit(CleanupEvent::Requested {
            threshold_mb: threshold,
            directory: target.to_path_buf(),
        });

        let initial = self.available_mb(target)?;
        let mut report = ReclaimReport {
            outcome: Outcome::AlreadySatisfied,
            threshold_mb: threshold,
            initial_available_mb: initial,
            final_available_mb: initial,
            files_scanned: 0,
            removed: Vec::new(),
            failures: Vec::new(),
            dry_run: config.dry_run,
        };

        if initial >= threshold {
            events.emit(CleanupEvent::EnoughSpace {
                available_mb: initial,
            });
            return Ok(report);
        }

        let mut queue = scanner::scan(dirs.paths()).into_oldest_first();
        report.files_scanned = queue.len();
        tracing::debug!(
            files = queue.len(),
            deficit_mb = threshold - initial,
            "Starting reclamation",
        );

        let mut available = initial;
        let mut credited_bytes: u64 = 0;

        while available < threshold {
            let Some(entry) = queue.pop_front() else {
                break;
            };

            if config.dry_run {
                events.emit(CleanupEvent::WouldRemove {
                    path: entry.path.clone(),
                    size_bytes: entry.size_bytes,
                });
                credited_bytes = credited_bytes.saturating_add(entry.size_bytes);
                available = initial.saturating_add(bytes_to_mb(credited_bytes));
                report.removed.push(entry.path);
            } else {
                events.emit(CleanupEvent::Removing {
                    path: entry.path.clone(),
                });
                match self.remover.remove(&entry.path) {
                    Ok(()) => report.removed.push(entry.path),
                    Err(source) => match config.policy {
                        DeletionPolicy::Abort => {
                            return Err(CleanupError::Deletion {
                                path: entry.path,
                                source,
                            });
                        }
                        DeletionPolicy::KeepGoing => {
                            let reason = source.to_string();
                            events.emit(CleanupEvent::DeletionFailed {
                                path: entry.path.clone(),
                                reason: reason.clone(),
                            });
                            report.failures.push(DeletionFailure {
                                path: entry.path,
                                reason,
                            });
                        }
                    },
                }
                available = self.available_mb(target)?;
            }

            events.emit(CleanupEvent::SpaceNow {
                available_mb: available,
            });
        }

        report.final_available_mb = available;
        report.outcome = if available >= threshold {
            Outcome::Reclaimed
        } else {
            events.emit(CleanupEvent::NotEnoughSpace {
                available_mb: available,
            });
            Outcome::ExhaustedInsufficient
        };

        tracing::debug!(
            outcome = ?report.outcome,
            removed = report.removed.len(),
            failed = report.failures.len(),
            "Reclamation finished",
        );

        Ok(report)
    }

    fn available_mb(&self, path: &Path) -> CleanupResult<i64> {
        self.space
            .available_mb(path)
            .map_err(|source| CleanupError::SpaceQuery {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Run the reclamation loop against the real filesystem.
pub fn reclaim<E>(
    dirs: &DirectorySet,
    config: &ReclaimConfig,
    events: &mut E,
) -> CleanupResult<ReclaimReport>
where
    E: EventSink + ?Sized,
{
    Reclaimer::default().run(dirs, config, events)
}
