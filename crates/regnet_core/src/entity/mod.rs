//! Registry entities and their ledger keys.
//!
//! | Entity            | Key                                |
//! |-------------------|------------------------------------|
//! | [`UserRequest`]     | (`request`, name, ssn)             |
//! | [`User`]            | (`user`, name, ssn)                |
//! | [`PropertyRequest`] | raw `propId`                       |
//! | [`Property`]        | (`property`, propId)               |

mod property;
mod user;

pub use property::{Property, PropertyRequest, PropertyStatus};
pub use user::{User, UserRequest};

use crate::error::{RegistryError, RegistryResult};
use regnet_codec::{validate_raw_key, ObjectKey};
use serde::Serialize;
use std::fmt;

/// Namespace of pending user requests.
pub const REQUEST_NAMESPACE: &str = "request";
/// Namespace of active users.
pub const USER_NAMESPACE: &str = "user";
/// Namespace of approved properties.
pub const PROPERTY_NAMESPACE: &str = "property";

/// The four kinds of record the registry stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Pending user account request.
    UserRequest,
    /// Active user account.
    User,
    /// Pending property registration.
    PropertyRequest,
    /// Registered property title.
    Property,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserRequest => "user request",
            Self::User => "user",
            Self::PropertyRequest => "property request",
            Self::Property => "property",
        })
    }
}

/// Address of a record in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    /// Namespaced composite key.
    Composite(ObjectKey),
    /// Caller-supplied key used verbatim.
    Raw(String),
}

impl EntityKey {
    /// Returns the string the ledger stores the record under.
    #[must_use]
    pub fn ledger_key(&self) -> String {
        match self {
            Self::Composite(key) => key.encode(),
            Self::Raw(key) => key.clone(),
        }
    }

    /// Returns the composite key, if this is one.
    #[must_use]
    pub fn as_object_key(&self) -> Option<&ObjectKey> {
        match self {
            Self::Composite(key) => Some(key),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite(key) => fmt::Display::fmt(key, f),
            Self::Raw(key) => write!(f, "{key:?}"),
        }
    }
}

impl From<ObjectKey> for EntityKey {
    fn from(key: ObjectKey) -> Self {
        Self::Composite(key)
    }
}

fn composite(namespace: &str, attributes: &[&str]) -> RegistryResult<ObjectKey> {
    ObjectKey::new(namespace, attributes.iter().copied())
        .map_err(|e| RegistryError::invalid_argument(e.to_string()))
}

/// Key of the pending request for user `(name, ssn)`.
pub fn user_request_key(name: &str, ssn: &str) -> RegistryResult<EntityKey> {
    composite(REQUEST_NAMESPACE, &[name, ssn]).map(EntityKey::Composite)
}

/// Reference to user `(name, ssn)`, as stored in ownership fields.
pub fn user_ref(name: &str, ssn: &str) -> RegistryResult<ObjectKey> {
    composite(USER_NAMESPACE, &[name, ssn])
}

/// Key of user `(name, ssn)`.
pub fn user_key(name: &str, ssn: &str) -> RegistryResult<EntityKey> {
    user_ref(name, ssn).map(EntityKey::Composite)
}

/// Key of the approved property `prop_id`.
pub fn property_key(prop_id: &str) -> RegistryResult<EntityKey> {
    composite(PROPERTY_NAMESPACE, &[prop_id]).map(EntityKey::Composite)
}

/// Key of the pending registration for `prop_id`.
///
/// Pending registrations are addressed by the bare property id.
pub fn property_request_key(prop_id: &str) -> RegistryResult<EntityKey> {
    validate_raw_key(prop_id).map_err(|e| RegistryError::invalid_argument(e.to_string()))?;
    Ok(EntityKey::Raw(prop_id.to_string()))
}
