use std::path::PathBuf;

/// Errors that end a cleanup run.
///
/// Skipped paths are not errors; they are reported as
/// [`CleanupEvent`](crate::events::CleanupEvent)s and the run carries on.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("No existing directory given")]
    NoExistingDirectory,

    #[error("{} and {} are not on the same device", first.display(), other.display())]
    DifferentDevices { first: PathBuf, other: PathBuf },

    #[error("Failed to read device id of {}: {source}", path.display())]
    DeviceQuery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to query free space of {}: {source}", path.display())]
    SpaceQuery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {}: {source}", path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CleanupResult<T> = Result<T, CleanupError>;
