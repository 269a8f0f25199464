//! Inspect command implementation.

use regnet_codec::ObjectKey;
use regnet_core::entity::{PROPERTY_NAMESPACE, REQUEST_NAMESPACE, USER_NAMESPACE};
use regnet_core::{EntityKind, Property, PropertyRequest, Record, User, UserRequest};
use regnet_storage::{FileLedger, LedgerStore, VersionedValue};
use serde::Serialize;
use std::path::Path;

/// Ledger inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Ledger path.
    pub path: String,
    /// Ledger height.
    pub height: u64,
    /// Number of entries listed.
    pub entry_count: usize,
    /// The listed entries, in key order.
    pub entries: Vec<Entry>,
}

/// One decoded ledger entry.
#[derive(Debug, Serialize)]
pub struct Entry {
    /// Printable form of the key.
    pub key: String,
    /// Entity kind, when the key maps to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    /// Version that last wrote the entry.
    pub version: u64,
    /// Decoded record, or `null` if it could not be decoded.
    pub record: serde_json::Value,
}

/// Runs the inspect command.
pub fn run(path: &Path, prefix: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No ledger found at {:?}", path).into());
    }

    let ledger = FileLedger::open(path)?;
    let result = collect(&ledger, prefix)?;

    match format {
        "text" => print_text_output(&result),
        _ => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

fn collect(ledger: &FileLedger, prefix: &str) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let entries: Vec<Entry> = ledger
        .scan_prefix(prefix)?
        .into_iter()
        .map(|(key, value)| describe(&key, &value))
        .collect();

    Ok(InspectResult {
        path: ledger.path().display().to_string(),
        height: ledger.height()?.as_u64(),
        entry_count: entries.len(),
        entries,
    })
}

fn describe(key: &str, value: &VersionedValue) -> Entry {
    let (label, kind) = match ObjectKey::parse(key) {
        Ok(object_key) => {
            let kind = match object_key.namespace() {
                REQUEST_NAMESPACE => Some(EntityKind::UserRequest),
                USER_NAMESPACE => Some(EntityKind::User),
                PROPERTY_NAMESPACE => Some(EntityKind::Property),
                _ => None,
            };
            (object_key.to_string(), kind)
        }
        Err(_) => (format!("{key:?}"), Some(EntityKind::PropertyRequest)),
    };

    let record = kind
        .and_then(|kind| decode(kind, &value.value))
        .unwrap_or(serde_json::Value::Null);

    Entry {
        key: label,
        kind,
        version: value.version.as_u64(),
        record,
    }
}

fn decode(kind: EntityKind, bytes: &[u8]) -> Option<serde_json::Value> {
    fn to_json<T: Record>(bytes: &[u8]) -> Option<serde_json::Value> {
        T::decode(bytes)
            .ok()
            .and_then(|record| serde_json::to_value(record).ok())
    }

    match kind {
        EntityKind::UserRequest => to_json::<UserRequest>(bytes),
        EntityKind::User => to_json::<User>(bytes),
        EntityKind::PropertyRequest => to_json::<PropertyRequest>(bytes),
        EntityKind::Property => to_json::<Property>(bytes),
    }
}

fn print_text_output(result: &InspectResult) {
    println!("Ledger: {}", result.path);
    println!("Height: {}", result.height);
    println!("Entries: {}", result.entry_count);
    println!();
    for entry in &result.entries {
        let kind = entry
            .kind
            .map_or_else(|| "unknown".to_string(), |k| k.to_string());
        println!("  {} [{}] v{}", entry.key, kind, entry.version);
        println!("    {}", entry.record);
    }
}
