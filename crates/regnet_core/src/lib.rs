//! # RegNet Core
//!
//! Entity repository and state-transition workflows for a registry of user
//! accounts and property titles.
//!
//! This crate provides:
//! - Typed entities ([`UserRequest`], [`User`], [`PropertyRequest`], [`Property`])
//! - A [`Repository`] giving typed access to those entities inside one invocation
//! - Registrar workflows that promote pending requests into active entities
//! - User workflows: requests, top-ups, property registration, listing and purchase
//! - A [`Registry`] facade that runs each operation as one atomic invocation
//!
//! ## Example
//!
//! ```rust
//! use regnet_core::{InvocationContext, Registry, RegistryConfig, TxTimestamp};
//! use regnet_storage::InMemoryLedger;
//! use std::sync::Arc;
//!
//! let registry = Registry::new(Arc::new(InMemoryLedger::new()), RegistryConfig::default());
//! let ctx = InvocationContext::anonymous(TxTimestamp::from_seconds(1_700_000_000));
//!
//! registry.create_user_request(&ctx, "Alice", "a@x.com", "555", "SSN1").unwrap();
//! let alice = registry.approve_new_user(&ctx, "Alice", "SSN1").unwrap();
//! assert_eq!(alice.balance, 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod operation;
pub mod registry;
pub mod repository;
pub mod workflow;

pub use config::{RegistryConfig, TopUpTable};
pub use context::{CallerIdentity, InvocationContext, TxTimestamp};
pub use entity::{
    EntityKey, EntityKind, Property, PropertyRequest, PropertyStatus, User, UserRequest,
};
pub use error::{ErrorKind, RegistryError, RegistryResult};
pub use operation::{Contract, Operation, Outcome};
pub use registry::Registry;
pub use repository::{Record, Repository};
pub use workflow::user::Recharge;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
