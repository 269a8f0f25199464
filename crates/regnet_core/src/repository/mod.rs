//! Typed entity access on top of an invocation.
//!
//! [`Repository`] wraps the current [`Invocation`] and translates between
//! ledger bytes and entity types implementing [`Record`]. Reads see writes
//! made earlier through the same repository.

use crate::entity::{EntityKey, EntityKind, Property, PropertyRequest, User, UserRequest};
use crate::error::{RegistryError, RegistryResult};
use regnet_codec::{decode_record, encode_record};
use regnet_storage::Invocation;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// An entity type the repository can store.
pub trait Record: Serialize + DeserializeOwned {
    /// Which entity this is, for errors and logs.
    const KIND: EntityKind;

    /// Encodes the record for the ledger.
    fn encode(&self) -> RegistryResult<Vec<u8>> {
        Ok(encode_record(self)?)
    }

    /// Decodes a record read from the ledger.
    fn decode(bytes: &[u8]) -> RegistryResult<Self> {
        Ok(decode_record(bytes)?)
    }
}

impl Record for UserRequest {
    const KIND: EntityKind = EntityKind::UserRequest;
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;
}

impl Record for PropertyRequest {
    const KIND: EntityKind = EntityKind::PropertyRequest;
}

impl Record for Property {
    const KIND: EntityKind = EntityKind::Property;
}

/// Typed read/write access to entities within one invocation.
///
/// A zero-length value counts as absent: `exists` returns false and `load`
/// fails with `NotFound`, never a default-valued entity.
pub struct Repository<'i, 'a> {
    invocation: &'i mut Invocation<'a>,
}

impl<'i, 'a> Repository<'i, 'a> {
    /// Creates a repository over `invocation`.
    pub fn new(invocation: &'i mut Invocation<'a>) -> Self {
        Self { invocation }
    }

    /// Returns true if a `T` is stored under `key`.
    pub fn exists<T: Record>(&mut self, key: &EntityKey) -> RegistryResult<bool> {
        let found = self.raw(key)?.is_some();
        debug!(kind = %T::KIND, %key, found, "exists");
        Ok(found)
    }

    /// Loads the `T` under `key`, or `None` if absent.
    pub fn find<T: Record>(&mut self, key: &EntityKey) -> RegistryResult<Option<T>> {
        self.raw(key)?.map(|bytes| T::decode(&bytes)).transpose()
    }

    /// Loads the `T` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if nothing is stored there.
    pub fn load<T: Record>(&mut self, key: &EntityKey) -> RegistryResult<T> {
        self.find(key)?
            .ok_or_else(|| RegistryError::not_found(T::KIND, key))
    }

    /// Stores `record` under `key`, replacing any previous value.
    pub fn save<T: Record>(&mut self, key: &EntityKey, record: &T) -> RegistryResult<()> {
        let bytes = record.encode()?;
        debug!(kind = %T::KIND, %key, len = bytes.len(), "save");
        self.invocation.put(&key.ledger_key(), bytes)?;
        Ok(())
    }

    /// Removes the `T` under `key`.
    pub fn remove<T: Record>(&mut self, key: &EntityKey) -> RegistryResult<()> {
        debug!(kind = %T::KIND, %key, "remove");
        self.invocation.delete(&key.ledger_key())?;
        Ok(())
    }

    fn raw(&mut self, key: &EntityKey) -> RegistryResult<Option<Vec<u8>>> {
        Ok(self
            .invocation
            .get(&key.ledger_key())?
            .filter(|bytes| !bytes.is_empty()))
    }
}
