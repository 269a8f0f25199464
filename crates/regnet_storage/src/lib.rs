//! # RegNet Storage
//!
//! The ledger store contract consumed by the RegNet registry.
//!
//! The ledger is a versioned key-value store. Keys are strings, values are
//! opaque byte strings: the store never interprets what it holds. All reads
//! and writes performed by one registry operation go through an
//! [`Invocation`], which buffers writes and hands them to the store as a
//! single [`WriteSet`]. The store applies a write set all-or-nothing.
//!
//! ## Design Principles
//!
//! - Stores are opaque byte maps (read, apply, height)
//! - Writes are only visible to other invocations after commit
//! - Conflicts are detected at commit by comparing observed versions
//! - Stores must be `Send + Sync` so one handle can serve many callers
//!
//! ## Available Stores
//!
//! - [`InMemoryLedger`] - For testing and ephemeral registries
//! - [`FileLedger`] - Snapshot-persisted ledger used by the CLI
//!
//! ## Example
//!
//! ```rust
//! use regnet_storage::{InMemoryLedger, Invocation};
//!
//! let ledger = InMemoryLedger::new();
//! let mut inv = Invocation::begin(&ledger);
//! inv.put("greeting", b"hello".to_vec()).unwrap();
//! inv.commit().unwrap();
//!
//! let mut inv = Invocation::begin(&ledger);
//! assert_eq!(inv.get("greeting").unwrap(), Some(b"hello".to_vec()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod invocation;
mod ledger;
mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileLedger;
pub use invocation::Invocation;
pub use ledger::{LedgerStore, PendingWrite, Version, VersionedValue, WriteSet};
pub use memory::{InMemoryLedger, LedgerSnapshot};
