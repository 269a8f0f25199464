//! Snapshot-persisted ledger.

use crate::error::StorageResult;
use crate::ledger::{LedgerStore, Version, VersionedValue, WriteSet};
use crate::memory::{InMemoryLedger, LedgerSnapshot};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A ledger persisted to a single snapshot file.
///
/// Entries live in memory; after every applied write set the whole ledger
/// is encoded as CBOR and written to a temporary file next to the target,
/// which is then renamed over it. A crash leaves either the old or the new
/// image on disk, never a mix.
///
/// Writers coordinate through an advisory lock on `<path>.lock`. `apply`
/// holds it while it reloads the image on disk, validates the read set
/// against that image and persists the result, so handles in different
/// processes never overwrite each other's commits.
///
/// # Example
///
/// ```no_run
/// use regnet_storage::{FileLedger, Invocation};
/// use std::path::Path;
///
/// let ledger = FileLedger::open(Path::new("ledger.cbor")).unwrap();
/// let mut inv = Invocation::begin(&ledger);
/// inv.put("k", b"v".to_vec()).unwrap();
/// inv.commit().unwrap(); // now on disk
/// ```
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    inner: InMemoryLedger,
    lock_file: Mutex<File>,
}

impl FileLedger {
    /// Opens the ledger stored at `path`, or an empty one if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded,
    /// or if the lock file cannot be created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path(path))?;

        let snapshot = load(path)?.unwrap_or_default();
        debug!(path = %path.display(), height = %snapshot.height, keys = snapshot.entries.len(), "ledger opened");

        Ok(Self {
            path: path.to_path_buf(),
            inner: InMemoryLedger::from_snapshot(snapshot),
            lock_file: Mutex::new(lock_file),
        })
    }

    /// Opens the ledger, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.snapshot()
    }

    /// Brings the in-memory copy up to the image on disk.
    ///
    /// Must be called with the file lock held.
    fn refresh(&self) -> StorageResult<LedgerSnapshot> {
        let current = self.inner.snapshot();
        match load(&self.path)? {
            Some(on_disk) if on_disk.height != current.height => {
                debug!(from = %current.height, to = %on_disk.height, "ledger reloaded");
                self.inner.restore(on_disk.clone());
                Ok(on_disk)
            }
            _ => Ok(current),
        }
    }

    fn persist(&self, snapshot: &LedgerSnapshot) -> StorageResult<()> {
        let bytes = snapshot.to_cbor()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "ledger persisted");
        Ok(())
    }
}

impl LedgerStore for FileLedger {
    fn read(&self, key: &str) -> StorageResult<Option<VersionedValue>> {
        self.inner.read(key)
    }

    fn apply(&self, write_set: &WriteSet) -> StorageResult<Version> {
        let lock_file = self.lock_file.lock();
        let _held = FileLock::acquire(&lock_file)?;

        // Staged on a copy so readers never observe an image that is not
        // on disk yet.
        let staged = InMemoryLedger::from_snapshot(self.refresh()?);
        let height = staged.apply(write_set)?;
        let next = staged.snapshot();
        self.persist(&next)?;
        self.inner.restore(next);

        Ok(height)
    }

    fn height(&self) -> StorageResult<Version> {
        self.inner.height()
    }

    fn scan_prefix(&self, prefix: &str) -> StorageResult<Vec<(String, VersionedValue)>> {
        self.inner.scan_prefix(prefix)
    }
}

/// Exclusive advisory lock, released on drop.
struct FileLock<'a>(&'a File);

impl<'a> FileLock<'a> {
    fn acquire(file: &'a File) -> StorageResult<Self> {
        FileExt::lock_exclusive(file)?;
        Ok(Self(file))
    }
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(self.0);
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn load(path: &Path) -> StorageResult<Option<LedgerSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Ok(Some(LedgerSnapshot::default()));
    }
    LedgerSnapshot::from_cbor(&bytes).map(Some)
}
