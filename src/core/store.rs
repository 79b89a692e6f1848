//! The cookie store manager: an in-memory name → record map, the
//! encryption boundary applied on every write and read, and crash-atomic
//! persistence of the whole container after each mutation.
//!
//! Values are ciphertext the entire time they are resident here; plaintext
//! exists only in call arguments and in the copies handed back to callers.

use crate::constants::{MAX_VALUE_SIZE, STORE_FILE_MODE};
use crate::core::codec;
use crate::core::crypto::{ValueCipher, XChaChaValueCipher};
use crate::core::error::StoreError;
use crate::core::file_lock::FileLock;
use crate::models::cookie::Cookie;
use crate::util::fs as store_fs;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct CookieStore {
    path: PathBuf,
    cipher: Box<dyn ValueCipher>,
    inner: RwLock<Inner>,
}

// Manual impl: the cipher is not Debug and the map holds ciphertext that
// has no business in debug output.
impl std::fmt::Debug for CookieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

struct Inner {
    cookies: BTreeMap<String, Cookie>,
    // None after close; dropping the handle releases the flock.
    lock: Option<FileLock>,
}

impl Inner {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.lock.is_some() {
            Ok(())
        } else {
            Err(StoreError::InvalidArgument("store is closed".to_string()))
        }
    }
}

impl CookieStore {
    /// Open (creating if absent) the container at `path` with the default
    /// cipher. The key length is validated before any I/O is attempted.
    pub fn open(path: impl AsRef<Path>, key: &[u8]) -> Result<Self, StoreError> {
        let cipher = XChaChaValueCipher::new(key)?;
        Self::open_with_cipher(path, Box::new(cipher))
    }

    /// Open with a caller-supplied encryption boundary.
    pub fn open_with_cipher(
        path: impl AsRef<Path>,
        cipher: Box<dyn ValueCipher>,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let lock = FileLock::try_exclusive(&lock_path(&path))?.ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "cookie store is locked by another process",
            ))
        })?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(STORE_FILE_MODE))?;
        }
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        drop(file);

        let cookies = codec::decode(&bytes)?;
        Ok(Self {
            path,
            cipher,
            inner: RwLock::new(Inner {
                cookies,
                lock: Some(lock),
            }),
        })
    }

    /// Unconditional upsert: encrypt the value, replace the record under
    /// its name, persist the whole map.
    pub fn set(&self, cookie: Cookie) -> Result<(), StoreError> {
        if cookie.name.is_empty() {
            return Err(StoreError::InvalidArgument(
                "cookie name is empty".to_string(),
            ));
        }
        if cookie.value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::InvalidArgument(format!(
                "cookie value exceeds maximum size ({} bytes, max {})",
                cookie.value.len(),
                MAX_VALUE_SIZE
            )));
        }
        let mut stored = cookie;
        stored.value = self.cipher.encrypt(&stored.value)?;

        let mut inner = self.write_inner();
        inner.ensure_open()?;
        inner.cookies.insert(stored.name.clone(), stored);
        self.persist(&inner)
    }

    /// Alias of [`set`](Self::set) for callers holding a reference; the
    /// two operations are intentionally the same upsert.
    pub fn update(&self, cookie: &Cookie) -> Result<(), StoreError> {
        self.set(cookie.clone())
    }

    /// Decrypt and return an independent copy of the named record.
    pub fn get(&self, name: &str) -> Result<Cookie, StoreError> {
        let inner = self.read_inner();
        inner.ensure_open()?;
        let stored = inner
            .cookies
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let mut cookie = stored.clone();
        cookie.value = self.cipher.decrypt(&stored.value)?;
        Ok(cookie)
    }

    /// Remove the named record and persist the reduced map.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.write_inner();
        inner.ensure_open()?;
        if inner.cookies.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.persist(&inner)
    }

    /// Copies of all resident records; values remain ciphertext.
    pub fn list(&self) -> Result<Vec<Cookie>, StoreError> {
        let inner = self.read_inner();
        inner.ensure_open()?;
        Ok(inner.cookies.values().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let inner = self.read_inner();
        inner.ensure_open()?;
        Ok(inner.cookies.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final flush, then release the lock handle. A second close, or any
    /// operation after close, fails instead of touching a released handle.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut inner = self.write_inner();
        inner.ensure_open()?;
        self.persist(&inner)?;
        inner.lock = None;
        Ok(())
    }

    // Called with the write guard held, so writers stay mutually exclusive
    // with each other and with readers for the whole encode-and-rename.
    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        let bytes = codec::encode(&inner.cookies)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::Builder::new()
            .prefix(".cookies-")
            .tempfile_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(STORE_FILE_MODE))?;
        }
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        store_fs::sync_parent_dir(&self.path)?;
        Ok(())
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}
