//! Filesystem helpers for private directories and durable writes.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn ensure_dir(path: &Path, mode: u32) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))?;
    }
    set_permissions(path, mode)
}

pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(mode);
        fs::set_permissions(path, perm)
            .with_context(|| format!("set permissions {:o} on {}", mode, path.display()))?;
    }
    Ok(())
}

/// Fsync the parent directory so a completed rename survives a crash.
pub fn sync_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_with_mode() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("store");
        ensure_dir(&sub, 0o700).unwrap();
        assert!(sub.is_dir());
        #[cfg(unix)]
        {
            let mode = fs::metadata(&sub).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn test_sync_parent_dir_ok() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"x").unwrap();
        sync_parent_dir(&file).unwrap();
    }
}
