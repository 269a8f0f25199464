//! Error types for ledger operations.

use std::io;
use thiserror::Error;

/// Result type for ledger operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A key read by the invocation was changed by a concurrent commit.
    #[error("read conflict on key {key:?}: observed {observed:?}, current {current:?}")]
    Conflict {
        /// The key whose version moved.
        key: String,
        /// Version seen when the invocation read the key.
        observed: Option<u64>,
        /// Version present at commit time.
        current: Option<u64>,
    },

    /// The key is not acceptable to the ledger.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The persisted ledger image is corrupted.
    #[error("ledger corrupted: {0}")]
    Corrupted(String),
}

impl StorageError {
    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }

    /// Returns true if this error is an optimistic concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
