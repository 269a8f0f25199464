//! Invocation context supplied by the executing platform.

use crate::error::{RegistryError, RegistryResult};
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical transaction timestamp.
///
/// Supplied by the caller, never read from a local clock, so every replica
/// re-executing the same invocation derives the same values from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxTimestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds.
    pub nanos: u32,
}

impl TxTimestamp {
    /// Creates a timestamp.
    #[must_use]
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Creates a timestamp with whole seconds.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Renders the timestamp as stored in `createdAt` fields.
    ///
    /// Whole seconds only, formatted as RFC 3339 UTC with milliseconds,
    /// e.g. `2023-11-14T22:13:20.000Z`.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if the seconds are out of range.
    pub fn to_created_at(&self) -> RegistryResult<String> {
        let at = DateTime::from_timestamp(self.seconds, 0).ok_or_else(|| {
            RegistryError::invalid_argument(format!(
                "transaction timestamp {} is out of range",
                self.seconds
            ))
        })?;
        Ok(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Identity of the party submitting an invocation.
///
/// Carried for auditing; no operation authorizes on it yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Creates an identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity used when the platform supplies none.
    #[must_use]
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    /// Returns the identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the platform hands an operation besides its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Transaction identifier.
    pub tx_id: Uuid,
    /// Who submitted the invocation.
    pub caller: CallerIdentity,
    /// The transaction's logical timestamp.
    pub timestamp: TxTimestamp,
}

impl InvocationContext {
    /// Creates a context with a fresh transaction id.
    #[must_use]
    pub fn new(caller: CallerIdentity, timestamp: TxTimestamp) -> Self {
        Self {
            tx_id: Uuid::new_v4(),
            caller,
            timestamp,
        }
    }

    /// Creates a context for an anonymous caller.
    #[must_use]
    pub fn anonymous(timestamp: TxTimestamp) -> Self {
        Self::new(CallerIdentity::anonymous(), timestamp)
    }

    /// Replaces the transaction id.
    #[must_use]
    pub fn with_tx_id(mut self, tx_id: Uuid) -> Self {
        self.tx_id = tx_id;
        self
    }
}
