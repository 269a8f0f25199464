//! Test fixtures and registry helpers.
//!
//! Provides registries over throwaway ledgers, a logical clock that moves
//! forward one second per invocation, and shortcuts for common setups.

use regnet_core::entity::user_key;
use regnet_core::{
    InvocationContext, Property, Registry, RegistryConfig, Repository, TxTimestamp, User,
};
use regnet_storage::{FileLedger, InMemoryLedger, Invocation, LedgerStore};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Timestamp of the first invocation a fixture runs.
pub const BASE_TIMESTAMP: i64 = 1_700_000_000;

/// A registry over a throwaway ledger.
pub struct TestRegistry<S: LedgerStore = InMemoryLedger> {
    /// The registry instance.
    pub registry: Registry<S>,
    clock: AtomicI64,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestRegistry<InMemoryLedger> {
    /// Creates a registry over an empty in-memory ledger.
    pub fn memory() -> Self {
        Self::memory_with_config(RegistryConfig::default())
    }

    /// Creates an in-memory registry with `config`.
    pub fn memory_with_config(config: RegistryConfig) -> Self {
        Self::wrap(Registry::new(Arc::new(InMemoryLedger::new()), config), None)
    }
}

impl TestRegistry<FileLedger> {
    /// Creates a registry over a ledger file in a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let ledger = FileLedger::open(&temp_dir.path().join("ledger.cbor"))
            .expect("Failed to open file ledger");
        Self::wrap(
            Registry::new(Arc::new(ledger), RegistryConfig::default()),
            Some(temp_dir),
        )
    }

    /// Returns the ledger file path.
    pub fn ledger_path(&self) -> PathBuf {
        self.registry.store().path().to_path_buf()
    }

    /// Opens a second registry over the same file, as a restarted process
    /// would see it.
    pub fn reopen(&self) -> Registry<FileLedger> {
        reopen(&self.ledger_path())
    }
}

/// Opens a registry over the ledger file at `path`.
pub fn reopen(path: &Path) -> Registry<FileLedger> {
    let ledger = FileLedger::open(path).expect("Failed to reopen file ledger");
    Registry::new(Arc::new(ledger), RegistryConfig::default())
}

impl<S: LedgerStore> TestRegistry<S> {
    fn wrap(registry: Registry<S>, temp_dir: Option<TempDir>) -> Self {
        Self {
            registry,
            clock: AtomicI64::new(BASE_TIMESTAMP),
            _temp_dir: temp_dir,
        }
    }

    /// Returns a context for the next invocation, one second after the last.
    pub fn ctx(&self) -> InvocationContext {
        let seconds = self.clock.fetch_add(1, Ordering::SeqCst);
        InvocationContext::anonymous(TxTimestamp::from_seconds(seconds))
    }

    /// Requests and approves the user `(name, ssn)`.
    pub fn onboard(&self, name: &str, ssn: &str) -> User {
        let email = format!("{}@example.com", name.to_lowercase());
        self.registry
            .create_user_request(&self.ctx(), name, &email, "555-0100", ssn)
            .expect("Failed to create user request");
        self.registry
            .approve_new_user(&self.ctx(), name, ssn)
            .expect("Failed to approve user")
    }

    /// Sets the balance of `(name, ssn)` directly in the ledger.
    ///
    /// Bypasses the top-up table so tests can start from any balance.
    pub fn fund(&self, name: &str, ssn: &str, balance: u64) -> User {
        let mut invocation = Invocation::begin(&**self.registry.store());
        let mut repo = Repository::new(&mut invocation);
        let key = user_key(name, ssn).expect("Invalid user key");
        let mut user: User = repo.load(&key).expect("User must exist before funding");
        user.balance = balance;
        repo.save(&key, &user).expect("Failed to save user");
        invocation.commit().expect("Failed to commit funding");
        user
    }

    /// Registers and approves `prop_id` for an existing owner.
    pub fn register_property(
        &self,
        prop_id: &str,
        price: u64,
        owner_name: &str,
        owner_ssn: &str,
    ) -> Property {
        self.registry
            .property_registration_request(&self.ctx(), prop_id, price, owner_name, owner_ssn)
            .expect("Failed to request property registration");
        self.registry
            .approve_property_request(&self.ctx(), prop_id)
            .expect("Failed to approve property")
    }

    /// Registers `prop_id` and puts it on sale.
    pub fn list_property(
        &self,
        prop_id: &str,
        price: u64,
        owner_name: &str,
        owner_ssn: &str,
    ) -> Property {
        self.register_property(prop_id, price, owner_name, owner_ssn);
        self.registry
            .update_property(&self.ctx(), prop_id, "onSale", owner_name, owner_ssn)
            .expect("Failed to list property")
    }

    /// Returns the current balance of `(name, ssn)`.
    pub fn balance(&self, name: &str, ssn: &str) -> u64 {
        self.registry
            .view_user(&self.ctx(), name, ssn)
            .expect("User must exist")
            .balance
    }
}

impl<S: LedgerStore> std::ops::Deref for TestRegistry<S> {
    type Target = Registry<S>;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Alice owns `P1` (price 300, on sale); Bob has 1000 and owns nothing.
    pub fn market() -> TestRegistry {
        let registry = TestRegistry::memory();
        registry.onboard("Alice", "SSN1");
        registry.onboard("Bob", "SSN2");
        registry.fund("Bob", "SSN2", 1000);
        registry.list_property("P1", 300, "Alice", "SSN1");
        registry
    }
}
