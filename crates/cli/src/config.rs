//! Run configuration assembled from the environment and the command line.

use std::path::PathBuf;

use spacekeeper_core::{DeletionPolicy, ReclaimConfig};

use crate::cli::Cli;

/// Default minimum free space: 50 GB.
pub const DEFAULT_MIN_AVAIL_MB: i64 = 50 * 1024;

/// Recording directory of the appliance this tool was written for.
pub const DEFAULT_DIRECTORY: &str = "/media/hdd/movie";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a number")]
    InvalidNumber { var: &'static str, value: String },
}

/// Defaults loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub min_avail_mb: i64,
    pub default_directory: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_avail_mb: DEFAULT_MIN_AVAIL_MB,
            default_directory: PathBuf::from(DEFAULT_DIRECTORY),
        }
    }
}

impl Settings {
    /// Load defaults from environment variables.
    ///
    /// | Env Var                    | Default            |
    /// |----------------------------|--------------------|
    /// | `SPACEKEEPER_MIN_AVAIL_MB` | `51200`            |
    /// | `SPACEKEEPER_DEFAULT_DIR`  | `/media/hdd/movie` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(value) = lookup("SPACEKEEPER_MIN_AVAIL_MB") {
            let parsed = value.trim().parse::<i64>();
            settings.min_avail_mb = parsed.map_err(|_| ConfigError::InvalidNumber {
                var: "SPACEKEEPER_MIN_AVAIL_MB",
                value,
            })?;
        }

        if let Some(dir) = lookup("SPACEKEEPER_DEFAULT_DIR").filter(|d| !d.trim().is_empty()) {
            settings.default_directory = PathBuf::from(dir);
        }

        Ok(settings)
    }
}

/// Everything one invocation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub directories: Vec<PathBuf>,
    pub reclaim: ReclaimConfig,
    pub json: bool,
}

impl RunConfig {
    /// Merge command-line arguments over environment defaults.
    pub fn resolve(cli: Cli, settings: Settings) -> Self {
        let directories = if cli.directories.is_empty() {
            vec![settings.default_directory]
        } else {
            cli.directories
        };

        let policy = if cli.keep_going {
            DeletionPolicy::KeepGoing
        } else {
            DeletionPolicy::Abort
        };

        let reclaim = ReclaimConfig::new(cli.min_avail_space.unwrap_or(settings.min_avail_mb))
            .with_policy(policy)
            .with_dry_run(cli.dry_run);

        Self {
            directories,
            reclaim,
            json: cli.json,
        }
    }
}
