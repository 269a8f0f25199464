//! Error types for registry operations.

use crate::entity::EntityKind;
use regnet_codec::CodecError;
use regnet_storage::StorageError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can end a registry invocation.
///
/// Every variant is terminal: the invocation aborts and none of its writes
/// reach the ledger.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A referenced entity is absent.
    #[error("{kind} {key} does not exist")]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Key that was looked up.
        key: String,
    },

    /// A create would duplicate an existing entity.
    #[error("{kind} {key} already exists")]
    AlreadyExists {
        /// Kind of the existing entity.
        kind: EntityKind,
        /// Key that is already taken.
        key: String,
    },

    /// Malformed or unrecognized input.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input.
        message: String,
    },

    /// The operation is not legal in the entity's current state.
    #[error("{kind} {key} is {state}: {message}")]
    InvalidState {
        /// Kind of the entity.
        kind: EntityKind,
        /// Key of the entity.
        key: String,
        /// Current state of the entity.
        state: String,
        /// Why the transition was rejected.
        message: String,
    },

    /// The caller does not own the entity.
    #[error("{claimant} is not the owner of {kind} {key}")]
    PermissionDenied {
        /// Kind of the entity.
        kind: EntityKind,
        /// Key of the entity.
        key: String,
        /// The user claiming ownership.
        claimant: String,
    },

    /// An account balance is below the required amount.
    #[error("insufficient funds: {account} has balance {balance}, {required} required")]
    InsufficientFunds {
        /// The account being debited.
        account: String,
        /// Its current balance.
        balance: u64,
        /// The amount required.
        required: u64,
    },

    /// Ledger error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Record or key codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl RegistryError {
    /// Creates a not found error.
    pub fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(kind: EntityKind, key: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.to_string(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns the flat classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::Storage(StorageError::Conflict { .. }) => ErrorKind::Conflict,
            Self::Storage(StorageError::InvalidKey { .. })
            | Self::Codec(CodecError::InvalidKeyComponent { .. }) => ErrorKind::InvalidArgument,
            Self::Storage(_) | Self::Codec(_) => ErrorKind::Internal,
        }
    }
}

/// Classification of [`RegistryError`] for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Referenced entity absent.
    NotFound,
    /// Duplicate create.
    AlreadyExists,
    /// Malformed or unrecognized input.
    InvalidArgument,
    /// Operation not legal in the current state.
    InvalidState,
    /// Caller is not the owner.
    PermissionDenied,
    /// Balance below the required amount.
    InsufficientFunds,
    /// A concurrent invocation changed data this one read.
    Conflict,
    /// Ledger or codec failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidState => "InvalidState",
            Self::PermissionDenied => "PermissionDenied",
            Self::InsufficientFunds => "InsufficientFunds",
            Self::Conflict => "Conflict",
            Self::Internal => "Internal",
        };
        f.write_str(name)
    }
}
