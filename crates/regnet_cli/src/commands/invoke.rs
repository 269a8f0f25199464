//! Invoke command implementation.

use super::Session;
use regnet_core::{InvocationContext, Operation, Outcome, Registry, RegistryError};
use regnet_storage::LedgerStore;
use serde::Serialize;
use tracing::info;

/// A failed operation as printed to stderr.
#[derive(Debug, Serialize)]
pub struct Failure {
    /// Error kind, e.g. `InsufficientFunds`.
    pub error: String,
    /// Full error message.
    pub message: String,
}

impl From<&RegistryError> for Failure {
    fn from(err: &RegistryError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Runs one operation and prints its result as JSON.
pub fn run(session: &Session, op: Operation) -> Result<(), Box<dyn std::error::Error>> {
    let registry = session.registry()?;
    let ctx = session.context();

    match execute(&registry, &ctx, op) {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&Failure::from(&err))?);
            Err(err.into())
        }
    }
}

fn execute<S: LedgerStore>(
    registry: &Registry<S>,
    ctx: &InvocationContext,
    op: Operation,
) -> Result<Outcome, RegistryError> {
    info!(contract = %op.contract(), function = op.name(), tx_id = %ctx.tx_id, "invoking");
    let outcome = registry.invoke(ctx, op)?;
    if let Some(message) = outcome.message() {
        info!("{message}");
    }
    Ok(outcome)
}
