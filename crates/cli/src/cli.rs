//! Command-line surface of the `cleanup` binary.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

const ABOUT: &str = "Cleans up the given directories until a given amount of free space is \
available on their device.";

const LONG_ABOUT: &str = "\
Cleans up the given directories until a given amount of free space is
available on their device.

If MIN_AVAIL_SPACE is already available, nothing is deleted. Otherwise:
  1. All files below the given directories are found recursively.
  2. The oldest files (by modification time) are deleted one by one until
     MIN_AVAIL_SPACE is available or there are no more files to delete.

Directories are never deleted. All directories must live on the same device.";

const AFTER_HELP: &str = "\
Examples:
  cleanup
  cleanup /path/to/my/recordings
  cleanup -s 12000 /path/to/my/recordings /path/to/more/recordings";

/// Parsed command-line arguments.
///
/// Unset options fall back to [`Settings`](crate::config::Settings).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cleanup",
    version,
    about = ABOUT,
    long_about = LONG_ABOUT,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Minimal amount of space in megabytes to have available (default 51200 MB)
    #[arg(
        short = 's',
        value_name = "MIN_AVAIL_SPACE",
        allow_negative_numbers = true,
        overrides_with = "min_avail_space"
    )]
    pub min_avail_space: Option<i64>,

    /// Log failed deletions and continue with the next file instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Show which files would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Directories to clean up (default /media/hdd/movie)
    #[arg(value_name = "DIRECTORY")]
    pub directories: Vec<PathBuf>,
}

/// Process exit code for a failed argument parse.
///
/// `--help` and `--version` are reported by clap as errors but are normal
/// exits.
pub fn parse_error_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
