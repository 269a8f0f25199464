//! Composite object keys.

use crate::error::{CodecError, CodecResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Separator placed before the namespace and after every component.
pub const KEY_DELIMITER: char = '\u{0}';

/// A composite ledger key: a namespace plus an ordered attribute tuple.
///
/// `ObjectKey` doubles as the typed reference one record holds to another
/// (e.g. a property's owner). It serializes as its encoded key string, so a
/// stored reference is byte-identical to the key it points at.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    namespace: String,
    attributes: Vec<String>,
}

impl ObjectKey {
    /// Builds a key from a namespace and attributes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidKeyComponent`] if the namespace is empty
    /// or any component contains [`KEY_DELIMITER`].
    pub fn new<I, S>(namespace: impl Into<String>, attributes: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(CodecError::invalid_component(
                namespace,
                "namespace must not be empty",
            ));
        }
        check_component(&namespace)?;

        let attributes = attributes
            .into_iter()
            .map(Into::into)
            .collect::<Vec<String>>();
        for attr in &attributes {
            check_component(attr)?;
        }

        Ok(Self {
            namespace,
            attributes,
        })
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the attributes in order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Encodes the key into its ledger form.
    #[must_use]
    pub fn encode(&self) -> String {
        let len = 2
            + self.namespace.len()
            + self.attributes.iter().map(|a| a.len() + 1).sum::<usize>();
        let mut out = String::with_capacity(len);

        out.push(KEY_DELIMITER);
        out.push_str(&self.namespace);
        out.push(KEY_DELIMITER);
        for attr in &self.attributes {
            out.push_str(attr);
            out.push(KEY_DELIMITER);
        }
        out
    }

    /// Parses an encoded composite key.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedKey`] if `key` was not produced by
    /// [`ObjectKey::encode`].
    pub fn parse(key: &str) -> CodecResult<Self> {
        let inner = key
            .strip_prefix(KEY_DELIMITER)
            .and_then(|rest| rest.strip_suffix(KEY_DELIMITER))
            .ok_or_else(|| CodecError::malformed_key(key))?;

        let mut parts = inner.split(KEY_DELIMITER);
        let namespace = match parts.next() {
            Some(ns) if !ns.is_empty() => ns.to_string(),
            _ => return Err(CodecError::malformed_key(key)),
        };

        Ok(Self {
            namespace,
            attributes: parts.map(str::to_string).collect(),
        })
    }

    /// Returns the common prefix of every key in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is not a valid key component.
    pub fn namespace_prefix(namespace: &str) -> CodecResult<String> {
        Ok(Self::new(namespace, Vec::<String>::new())?.encode())
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.namespace, self.attributes.join(", "))
    }
}

impl Serialize for ObjectKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for ObjectKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Checks that `key` can be used as a raw (non-composite) ledger key.
///
/// # Errors
///
/// Returns [`CodecError::InvalidKeyComponent`] for empty keys and keys
/// starting with [`KEY_DELIMITER`], which is reserved for composite keys.
pub fn validate_raw_key(key: &str) -> CodecResult<()> {
    if key.is_empty() {
        return Err(CodecError::invalid_component(key, "key must not be empty"));
    }
    if key.starts_with(KEY_DELIMITER) {
        return Err(CodecError::invalid_component(
            key.escape_debug().to_string(),
            "raw key must not start with the composite key delimiter",
        ));
    }
    Ok(())
}

fn check_component(component: &str) -> CodecResult<()> {
    if component.contains(KEY_DELIMITER) {
        return Err(CodecError::invalid_component(
            component.escape_debug().to_string(),
            "contains the composite key delimiter",
        ));
    }
    Ok(())
}
