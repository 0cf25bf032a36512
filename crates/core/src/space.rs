//! Free-space queries.
//!
//! The filesystem's free-space counter is treated as an external oracle that
//! is re-read on demand after every deletion.

use std::io;
use std::path::Path;

/// Bytes per megabyte (MiB) used for all threshold arithmetic.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Reports the space available to unprivileged users on the device hosting
/// a path, in whole megabytes (rounded down).
pub trait SpaceProbe {
    fn available_mb(&self, path: &Path) -> io::Result<i64>;
}

impl<T: SpaceProbe + ?Sized> SpaceProbe for &T {
    fn available_mb(&self, path: &Path) -> io::Result<i64> {
        (**self).available_mb(path)
    }
}

/// [`SpaceProbe`] backed by `statvfs(3)`.
///
/// Uses `f_bavail * f_frsize`, i.e. the blocks available to non-root
/// processes, which is what a recording appliance can actually write into.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatvfsProbe;

impl SpaceProbe for StatvfsProbe {
    #[cfg(unix)]
    fn available_mb(&self, path: &Path) -> io::Result<i64> {
        use std::ffi::CString;
        use std::mem::MaybeUninit;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut stat = MaybeUninit::<libc::statvfs>::uninit();

        // Safety: `c_path` is a valid NUL-terminated string and `stat` points
        // to writable memory of the right size.
        let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }

        // Safety: statvfs returned 0, so the struct is initialised.
        let stat = unsafe { stat.assume_init() };
        let available = stat.f_bavail as u64 * stat.f_frsize as u64;
        Ok(bytes_to_mb(available))
    }

    #[cfg(not(unix))]
    fn available_mb(&self, _path: &Path) -> io::Result<i64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "statvfs is only available on Unix",
        ))
    }
}

/// Convert a byte count to whole megabytes, rounding down.
pub fn bytes_to_mb(bytes: u64) -> i64 {
    i64::try_from(bytes / BYTES_PER_MB).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_mb_rounds_down() {
        assert_eq!(bytes_to_mb(0), 0);
        assert_eq!(bytes_to_mb(BYTES_PER_MB - 1), 0);
        assert_eq!(bytes_to_mb(BYTES_PER_MB), 1);
        assert_eq!(bytes_to_mb(4 * BYTES_PER_MB + 17), 4);
    }

    #[cfg(unix)]
    #[test]
    fn statvfs_reports_non_negative_space_for_temp_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mb = StatvfsProbe.available_mb(dir.path()).expect("statvfs");
        assert!(mb >= 0);
    }

    #[cfg(unix)]
    #[test]
    fn statvfs_fails_for_missing_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let result = StatvfsProbe.available_mb(&dir.path().join("missing"));
        assert!(result.is_err());
    }
}
