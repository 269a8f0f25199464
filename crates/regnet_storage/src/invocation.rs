//! Invocation-scoped access to a ledger.

use crate::error::{StorageError, StorageResult};
use crate::ledger::{LedgerStore, PendingWrite, Version, WriteSet};
use tracing::debug;

/// One atomic execution against a ledger.
///
/// Reads see committed state plus every write made earlier in the same
/// invocation. Writes are buffered and only reach the ledger on
/// [`Invocation::commit`], all together. Dropping or aborting an invocation
/// discards its writes.
///
/// `commit` and `abort` consume the invocation, so it cannot be reused.
pub struct Invocation<'a> {
    store: &'a dyn LedgerStore,
    write_set: WriteSet,
}

impl<'a> Invocation<'a> {
    /// Starts a new invocation against `store`.
    pub fn begin(store: &'a dyn LedgerStore) -> Self {
        Self {
            store,
            write_set: WriteSet::new(),
        }
    }

    /// Reads the value under `key`.
    ///
    /// Buffered writes of this invocation take precedence over committed
    /// state. Committed reads are recorded for conflict detection.
    pub fn get(&mut self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_key(key)?;

        if let Some(pending) = self.write_set.pending(key) {
            return Ok(match pending {
                PendingWrite::Put { value } => Some(value.clone()),
                PendingWrite::Delete => None,
            });
        }

        let committed = self.store.read(key)?;
        self.write_set
            .record_read(key, committed.as_ref().map(|v| v.version));
        debug!(key = %key.escape_debug(), found = committed.is_some(), "ledger read");

        Ok(committed.map(|v| v.value))
    }

    /// Buffers a put of `value` under `key`.
    pub fn put(&mut self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        validate_key(key)?;
        debug!(key = %key.escape_debug(), len = value.len(), "ledger put");
        self.write_set.put(key, value);
        Ok(())
    }

    /// Buffers a delete of `key`.
    pub fn delete(&mut self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        debug!(key = %key.escape_debug(), "ledger delete");
        self.write_set.delete(key);
        Ok(())
    }

    /// Returns the buffered write set.
    #[must_use]
    pub fn write_set(&self) -> &WriteSet {
        &self.write_set
    }

    /// Submits every buffered write to the ledger at once.
    ///
    /// A read-only invocation applies nothing and returns the current height.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`] if a key read by this invocation
    /// was changed by another commit. Nothing is written in that case.
    pub fn commit(self) -> StorageResult<Version> {
        if self.write_set.is_read_only() {
            return self.store.height();
        }
        let height = self.store.apply(&self.write_set)?;
        debug!(%height, writes = self.write_set.write_count(), "invocation committed");
        Ok(height)
    }

    /// Discards every buffered write.
    pub fn abort(self) {
        debug!(
            writes = self.write_set.write_count(),
            "invocation aborted"
        );
    }
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("write_set", &self.write_set)
            .finish_non_exhaustive()
    }
}

fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key(key, "key must not be empty"));
    }
    Ok(())
}
