//! # RegNet Testkit
//!
//! Test utilities for RegNet.
//!
//! This crate provides:
//! - Registry fixtures over in-memory and file ledgers
//! - Property-based test generators using proptest
//!
//! Cross-crate scenario tests live in this crate's `tests/` directory.
//!
//! ## Usage
//!
//! ```rust
//! use regnet_testkit::prelude::*;
//!
//! let registry = TestRegistry::memory();
//! registry.onboard("Alice", "SSN1");
//! let alice = registry.fund("Alice", "SSN1", 500);
//! assert_eq!(alice.balance, 500);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
