//! In-memory ledger for testing.

use crate::error::{StorageError, StorageResult};
use crate::ledger::{LedgerStore, PendingWrite, Version, VersionedValue, WriteSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point-in-time copy of a ledger's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Height of the last applied write set.
    pub height: Version,
    /// Every live entry, in key order.
    pub entries: BTreeMap<String, VersionedValue>,
}

impl LedgerSnapshot {
    /// Encodes the snapshot as CBOR.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_cbor(&self) -> StorageResult<Vec<u8>> {
        let mut out = Vec::new();
        ciborium::into_writer(self, &mut out)
            .map_err(|e| StorageError::Corrupted(format!("snapshot encode: {e}")))?;
        Ok(out)
    }

    /// Decodes a snapshot from CBOR.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupted`] if the bytes are not a snapshot.
    pub fn from_cbor(bytes: &[u8]) -> StorageResult<Self> {
        ciborium::from_reader(bytes)
            .map_err(|e| StorageError::Corrupted(format!("snapshot decode: {e}")))
    }
}

/// An in-memory ledger.
///
/// This ledger keeps all entries in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral registries that don't need persistence
///
/// # Thread Safety
///
/// Write sets are validated and applied under a single write lock, so
/// concurrent commits are serialized.
///
/// # Example
///
/// ```rust
/// use regnet_storage::{InMemoryLedger, LedgerStore, WriteSet};
///
/// let ledger = InMemoryLedger::new();
/// let mut ws = WriteSet::new();
/// ws.put("k", b"v".to_vec());
/// ledger.apply(&ws).unwrap();
/// assert_eq!(ledger.read("k").unwrap().unwrap().value, b"v");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerSnapshot>,
}

impl InMemoryLedger {
    /// Creates a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger holding the contents of `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Returns a copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.read().clone()
    }

    /// Replaces the current contents with `snapshot`.
    pub fn restore(&self, snapshot: LedgerSnapshot) {
        *self.state.write() = snapshot;
    }

    /// Returns the number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStore for InMemoryLedger {
    fn read(&self, key: &str) -> StorageResult<Option<VersionedValue>> {
        Ok(self.state.read().entries.get(key).cloned())
    }

    fn apply(&self, write_set: &WriteSet) -> StorageResult<Version> {
        let mut state = self.state.write();

        for (key, observed) in write_set.reads() {
            let current = state.entries.get(key).map(|v| v.version);
            if current != observed {
                return Err(StorageError::Conflict {
                    key: key.to_string(),
                    observed: observed.map(Version::as_u64),
                    current: current.map(Version::as_u64),
                });
            }
        }

        let height = state.height.next();
        for (key, write) in write_set.writes() {
            match write {
                PendingWrite::Put { value } => {
                    state.entries.insert(
                        key.to_string(),
                        VersionedValue {
                            value: value.clone(),
                            version: height,
                        },
                    );
                }
                PendingWrite::Delete => {
                    state.entries.remove(key);
                }
            }
        }
        state.height = height;

        Ok(height)
    }

    fn height(&self) -> StorageResult<Version> {
        Ok(self.state.read().height)
    }

    fn scan_prefix(&self, prefix: &str) -> StorageResult<Vec<(String, VersionedValue)>> {
        let state = self.state.read();
        Ok(state
            .entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn put(ledger: &InMemoryLedger, key: &str, value: &[u8]) -> Version {
        let mut ws = WriteSet::new();
        ws.put(key, value.to_vec());
        ledger.apply(&ws).unwrap()
    }

    #[test]
    fn memory_new_is_empty() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.height().unwrap(), Version::new(0));
    }

    #[test]
    fn apply_advances_height_and_versions_keys() {
        let ledger = InMemoryLedger::new();

        assert_eq!(put(&ledger, "a", b"1"), Version::new(1));
        assert_eq!(put(&ledger, "b", b"2"), Version::new(2));

        assert_eq!(ledger.read("a").unwrap().unwrap().version, Version::new(1));
        assert_eq!(ledger.read("b").unwrap().unwrap().version, Version::new(2));
        assert_eq!(ledger.height().unwrap(), Version::new(2));
    }

    #[test]
    fn conflicting_write_set_applies_nothing() {
        let ledger = InMemoryLedger::new();
        put(&ledger, "a", b"1");

        let mut ws = WriteSet::new();
        ws.record_read("a", None);
        ws.put("a", b"2".to_vec());
        ws.put("b", b"3".to_vec());

        assert!(ledger.apply(&ws).unwrap_err().is_conflict());
        assert_eq!(ledger.read("a").unwrap().unwrap().value, b"1");
        assert!(ledger.read("b").unwrap().is_none());
        assert_eq!(ledger.height().unwrap(), Version::new(1));
    }

    #[test]
    fn delete_removes_key() {
        let ledger = InMemoryLedger::new();
        put(&ledger, "a", b"1");

        let mut ws = WriteSet::new();
        ws.delete("a");
        ledger.apply(&ws).unwrap();

        assert!(ledger.read("a").unwrap().is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn scan_prefix_returns_matching_keys_in_order() {
        let ledger = InMemoryLedger::new();
        put(&ledger, "\u{0}user\u{0}b\u{0}", b"2");
        put(&ledger, "\u{0}user\u{0}a\u{0}", b"1");
        put(&ledger, "\u{0}property\u{0}p\u{0}", b"3");
        put(&ledger, "raw", b"4");

        let users = ledger.scan_prefix("\u{0}user\u{0}").unwrap();
        let keys: Vec<_> = users.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["\u{0}user\u{0}a\u{0}", "\u{0}user\u{0}b\u{0}"]);
        assert_eq!(ledger.scan_prefix("").unwrap().len(), 4);
    }

    #[test]
    fn snapshot_cbor_roundtrip() {
        let ledger = InMemoryLedger::new();
        put(&ledger, "a", b"\x00\x01binary");
        put(&ledger, "b", b"");

        let snapshot = ledger.snapshot();
        let restored = LedgerSnapshot::from_cbor(&snapshot.to_cbor().unwrap()).unwrap();
        assert_eq!(restored, snapshot);

        let copy = InMemoryLedger::from_snapshot(restored);
        assert_eq!(copy.height().unwrap(), Version::new(2));
        assert_eq!(copy.read("a").unwrap().unwrap().value, b"\x00\x01binary");
    }

    #[test]
    fn garbage_snapshot_is_corrupted() {
        let result = LedgerSnapshot::from_cbor(b"\xff\xff not cbor");
        assert!(matches!(result, Err(StorageError::Corrupted(_))));
    }

    #[test]
    fn snapshot_values_encode_as_byte_strings() {
        let ledger = InMemoryLedger::new();
        put(&ledger, "a", b"xyz");

        let bytes = ledger.snapshot().to_cbor().unwrap();
        // major type 2, length 3
        assert!(bytes.windows(4).any(|w| w == b"\x43xyz"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8, Vec<u8>),
        Delete(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4, prop::collection::vec(any::<u8>(), 0..8)).prop_map(|(k, v)| Op::Put(k, v)),
            (0u8..4).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn applied_write_sets_match_map_model(
            batches in prop::collection::vec(prop::collection::vec(op_strategy(), 1..4), 0..12)
        ) {
            let ledger = InMemoryLedger::new();
            let mut model: BTreeMap<String, Vec<u8>> = BTreeMap::new();

            for (i, batch) in batches.iter().enumerate() {
                let mut ws = WriteSet::new();
                for op in batch {
                    match op {
                        Op::Put(k, v) => {
                            ws.put(&format!("k{k}"), v.clone());
                            model.insert(format!("k{k}"), v.clone());
                        }
                        Op::Delete(k) => {
                            ws.delete(&format!("k{k}"));
                            model.remove(&format!("k{k}"));
                        }
                    }
                }
                prop_assert_eq!(ledger.apply(&ws).unwrap(), Version::new(i as u64 + 1));
            }

            let stored: BTreeMap<String, Vec<u8>> = ledger
                .scan_prefix("")
                .unwrap()
                .into_iter()
                .map(|(k, v)| (k, v.value))
                .collect();
            prop_assert_eq!(stored, model);
        }
    }
}
