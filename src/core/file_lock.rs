//! File-based locking using flock(2) so one process owns a store at a time.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// An exclusive flock on the store's sibling lock file. Held for the
/// store's whole lifetime; released on drop (file close releases flock).
pub struct FileLock {
    _file: File,
}

impl FileLock {
    /// Try to acquire an exclusive lock without blocking.
    /// Returns `Ok(None)` if another process already holds the store.
    pub fn try_exclusive(path: &Path) -> io::Result<Option<Self>> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file })),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            // fs2 on Linux may return Other instead of WouldBlock
            Err(ref e) if e.raw_os_error() == Some(11) => Ok(None), // EAGAIN
            Err(e) => Err(e),
        }
    }
}
