//! Recursive inventory of regular files.
//!
//! [`walk`] lazily yields a [`FileEntry`] for every regular file below a
//! directory; [`scan`] folds the walks of several directories into a
//! deduplicated [`Inventory`].

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use walkdir::WalkDir;

/// A regular file eligible for deletion, snapshotted at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub modified_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Files found by a scan, unique by path, in discovery order.
#[derive(Debug, Default)]
pub struct Inventory {
    entries: Vec<FileEntry>,
    seen: HashSet<PathBuf>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry unless its path is already present.
    ///
    /// Returns `true` if the entry was new.
    pub fn insert(&mut self, entry: FileEntry) -> bool {
        if !self.seen.insert(entry.path.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the inventory, oldest file first.
    ///
    /// The sort is stable: files with equal modification times keep their
    /// discovery order.
    pub fn into_oldest_first(self) -> VecDeque<FileEntry> {
        let mut entries = self.entries;
        entries.sort_by_key(|e| e.modified_at);
        entries.into()
    }
}

impl Extend<FileEntry> for Inventory {
    fn extend<I: IntoIterator<Item = FileEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

/// Walk `root` recursively and yield every regular file below it.
///
/// Symlinks are not followed and never reported; directories and special
/// files are skipped. Entries that cannot be read are logged and skipped.
pub fn walk(root: &Path) -> impl Iterator<Item = FileEntry> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping file without metadata");
                    return None;
                }
            };
            let modified = match metadata.modified() {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping file without mtime");
                    return None;
                }
            };
            Some(FileEntry {
                path: entry.into_path(),
                modified_at: DateTime::<Utc>::from(modified),
                size_bytes: metadata.len(),
            })
        })
}

/// Scan every directory in order and collect the files into one inventory.
///
/// Roots are canonicalised first so nested or overlapping directories
/// produce identical paths and each file is counted once.
pub fn scan<P: AsRef<Path>>(directories: &[P]) -> Inventory {
    let mut inventory = Inventory::new();

    for dir in directories {
        let dir = dir.as_ref();
        let root = match dir.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "Cannot resolve directory, scanning as given");
                dir.to_path_buf()
            }
        };
        let before = inventory.len();
        inventory.extend(walk(&root));
        tracing::debug!(
            path = %root.display(),
            found = inventory.len() - before,
            "Scanned directory",
        );
    }

    inventory
}
