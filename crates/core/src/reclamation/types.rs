//! Configuration and report types for the reclamation loop.

use std::path::PathBuf;

use serde::Serialize;

/// What to do when a selected file cannot be deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Stop the run with [`CleanupError::Deletion`](crate::CleanupError::Deletion).
    /// Files already removed stay removed.
    #[default]
    Abort,
    /// Report the failure and move on to the next oldest file.
    KeepGoing,
}

/// Inputs of one reclamation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclaimConfig {
    /// Minimum free space, in MB, wanted on the device. Zero or negative
    /// never triggers a cleanup.
    pub threshold_mb: i64,
    pub policy: DeletionPolicy,
    /// Select files as usual but delete nothing; free space is estimated
    /// from the sizes recorded at scan time.
    pub dry_run: bool,
}

impl ReclaimConfig {
    pub fn new(threshold_mb: i64) -> Self {
        Self {
            threshold_mb,
            policy: DeletionPolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_policy(mut self, policy: DeletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Enough space before anything was scanned.
    AlreadySatisfied,
    /// Deleting old files brought free space up to the threshold.
    Reclaimed,
    /// Every file was deleted and the threshold is still not met.
    ExhaustedInsufficient,
}

/// A file that could not be removed under [`DeletionPolicy::KeepGoing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary returned after a run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReclaimReport {
    pub outcome: Outcome,
    pub threshold_mb: i64,
    pub initial_available_mb: i64,
    pub final_available_mb: i64,
    pub files_scanned: usize,
    /// Removed files, oldest first. In a dry run, the files that would
    /// have been removed.
    pub removed: Vec<PathBuf>,
    pub failures: Vec<DeletionFailure>,
    pub dry_run: bool,
}
