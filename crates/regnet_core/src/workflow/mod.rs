//! Registry workflows.
//!
//! Each workflow function implements one business transition against a
//! [`Repository`](crate::Repository). It reads what it needs, validates,
//! and stages writes; committing is left to the caller, so a workflow that
//! returns an error has written nothing.
//!
//! - [`registrar`] - approvals and read-only views
//! - [`user`] - self-service requests, top-ups, listing and purchase

pub mod registrar;
pub mod user;

#[cfg(test)]
pub(crate) mod testing {
    use crate::context::{InvocationContext, TxTimestamp};
    use crate::error::RegistryResult;
    use crate::repository::Repository;
    use regnet_storage::{InMemoryLedger, Invocation};

    pub const T0: i64 = 1_700_000_000;

    pub fn ctx() -> InvocationContext {
        InvocationContext::anonymous(TxTimestamp::from_seconds(T0))
    }

    /// Runs `f` in one invocation, committing only on success.
    pub fn run<R>(
        ledger: &InMemoryLedger,
        f: impl FnOnce(&mut Repository<'_, '_>) -> RegistryResult<R>,
    ) -> RegistryResult<R> {
        let mut inv = Invocation::begin(ledger);
        let result = f(&mut Repository::new(&mut inv));
        match result {
            Ok(value) => {
                inv.commit()?;
                Ok(value)
            }
            Err(e) => {
                inv.abort();
                Err(e)
            }
        }
    }
}
