//! Storage-device identity.
//!
//! Directories cleaned in one run must share a single free-space pool, so
//! the validator compares the device each one lives on. The lookup sits
//! behind [`DeviceProbe`] so tests can model several devices without real
//! hardware.

use std::io;
use std::path::Path;

use serde::Serialize;

/// Platform device identifier (`st_dev` on Unix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceId(pub u64);

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves which device a path lives on.
pub trait DeviceProbe {
    fn device_id_of(&self, path: &Path) -> io::Result<DeviceId>;
}

impl<T: DeviceProbe + ?Sized> DeviceProbe for &T {
    fn device_id_of(&self, path: &Path) -> io::Result<DeviceId> {
        (**self).device_id_of(path)
    }
}

/// [`DeviceProbe`] backed by `stat(2)` via [`std::fs::metadata`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataDeviceProbe;

impl DeviceProbe for MetadataDeviceProbe {
    #[cfg(unix)]
    fn device_id_of(&self, path: &Path) -> io::Result<DeviceId> {
        use std::os::unix::fs::MetadataExt;

        Ok(DeviceId(std::fs::metadata(path)?.dev()))
    }

    #[cfg(not(unix))]
    fn device_id_of(&self, _path: &Path) -> io::Result<DeviceId> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "device ids are only available on Unix",
        ))
    }
}
