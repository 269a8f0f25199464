//! CLI command implementations.

pub mod inspect;
pub mod invoke;

use regnet_core::{
    CallerIdentity, InvocationContext, Registry, RegistryConfig, TopUpTable, TxTimestamp,
};
use regnet_storage::FileLedger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options shared by every command that runs an operation.
#[derive(Debug, Default)]
pub struct Session {
    /// Ledger file.
    pub ledger: Option<PathBuf>,
    /// Caller identity, anonymous when unset.
    pub caller: Option<String>,
    /// Transaction timestamp in Unix seconds, now when unset.
    pub timestamp: Option<i64>,
    /// Top-up table file, built-in table when unset.
    pub top_up_table: Option<PathBuf>,
    /// Whether purchases credit the seller.
    pub credit_seller: bool,
}

impl Session {
    /// Opens the ledger file and builds a registry over it.
    pub fn registry(&self) -> Result<Registry<FileLedger>, Box<dyn std::error::Error>> {
        let path = self.ledger.as_deref().ok_or("Ledger path required")?;
        let ledger = FileLedger::open_with_create_dirs(path)?;

        let mut config = RegistryConfig::new().credit_seller(self.credit_seller);
        if let Some(table) = &self.top_up_table {
            config = config.top_up_table(load_top_up_table(table)?);
        }
        Ok(Registry::new(Arc::new(ledger), config))
    }

    /// Builds the invocation context for one operation.
    pub fn context(&self) -> InvocationContext {
        let caller = self
            .caller
            .as_deref()
            .map_or_else(CallerIdentity::anonymous, CallerIdentity::new);
        let seconds = self
            .timestamp
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        InvocationContext::new(caller, TxTimestamp::from_seconds(seconds))
    }
}

fn load_top_up_table(path: &Path) -> Result<TopUpTable, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read top-up table {}: {e}", path.display()))?;
    let table: TopUpTable = serde_json::from_str(&text)?;
    if table.is_empty() {
        return Err(format!("Top-up table {} has no codes", path.display()).into());
    }
    Ok(table)
}
