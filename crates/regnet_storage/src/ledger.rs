//! Ledger store trait definition and write-set types.

use crate::error::StorageResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Commit height that last wrote a key.
///
/// Heights increase by one for every applied write set. A key's version is
/// the height of the commit that last put it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u64);

impl Version {
    /// Creates a new version.
    #[must_use]
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// Returns the raw height.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next version.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A stored value together with the version that wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// The raw value bytes.
    #[serde(with = "serde_bytes")]
    pub value: Vec<u8>,
    /// The commit height that wrote the value.
    pub version: Version,
}

/// A buffered write inside an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    /// Insert or replace the value under a key.
    Put {
        /// Value bytes.
        value: Vec<u8>,
    },
    /// Remove the key.
    Delete,
}

/// Everything an invocation read and wants to write.
///
/// The read set maps each key read from committed state to the version
/// observed (`None` when the key was absent). The store uses it to reject
/// the write set if any of those keys moved since.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    reads: BTreeMap<String, Option<Version>>,
    writes: BTreeMap<String, PendingWrite>,
}

impl WriteSet {
    /// Creates an empty write set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the version observed for a committed read.
    ///
    /// The first observation wins, and keys already written by this write
    /// set are not recorded.
    pub fn record_read(&mut self, key: &str, observed: Option<Version>) {
        if !self.writes.contains_key(key) && !self.reads.contains_key(key) {
            self.reads.insert(key.to_string(), observed);
        }
    }

    /// Buffers a put.
    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        self.writes
            .insert(key.to_string(), PendingWrite::Put { value });
    }

    /// Buffers a delete.
    pub fn delete(&mut self, key: &str) {
        self.writes.insert(key.to_string(), PendingWrite::Delete);
    }

    /// Returns the buffered write for a key, if any.
    #[must_use]
    pub fn pending(&self, key: &str) -> Option<&PendingWrite> {
        self.writes.get(key)
    }

    /// Iterates over buffered writes in key order.
    pub fn writes(&self) -> impl Iterator<Item = (&str, &PendingWrite)> {
        self.writes.iter().map(|(k, w)| (k.as_str(), w))
    }

    /// Iterates over the read set in key order.
    pub fn reads(&self) -> impl Iterator<Item = (&str, Option<Version>)> {
        self.reads.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the number of buffered writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Returns true if nothing would be written.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// A versioned key-value ledger.
///
/// Ledgers are **opaque byte maps**. The registry owns every record format;
/// a ledger only stores, versions and atomically replaces bytes.
///
/// # Invariants
///
/// - `apply` makes every write of a write set visible, or none of them
/// - `apply` fails with [`crate::StorageError::Conflict`] if any key in the
///   read set no longer carries the observed version
/// - each successful `apply` advances `height` by exactly one
/// - Ledgers must be `Send + Sync` for concurrent callers
///
/// # Implementors
///
/// - [`super::InMemoryLedger`] - For testing
/// - [`super::FileLedger`] - Snapshot-persisted
pub trait LedgerStore: Send + Sync {
    /// Reads the committed value of a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn read(&self, key: &str) -> StorageResult<Option<VersionedValue>>;

    /// Atomically applies a write set and returns the new height.
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the read set is stale, or an error if
    /// the write cannot be made durable. Nothing is applied on error.
    fn apply(&self, write_set: &WriteSet) -> StorageResult<Version>;

    /// Returns the height of the last applied write set.
    ///
    /// # Errors
    ///
    /// Returns an error if the height cannot be determined.
    fn height(&self) -> StorageResult<Version>;

    /// Returns all committed entries whose key starts with `prefix`, in key
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn scan_prefix(&self, prefix: &str) -> StorageResult<Vec<(String, VersionedValue)>>;
}
