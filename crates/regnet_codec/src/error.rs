//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while building keys or encoding records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A namespace, attribute or raw key cannot be used in a key.
    #[error("invalid key component {component:?}: {reason}")]
    InvalidKeyComponent {
        /// The rejected component.
        component: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A string is not a well-formed composite key.
    #[error("malformed composite key {key:?}")]
    MalformedKey {
        /// The offending key (escaped for display).
        key: String,
    },

    /// Failed to encode a record.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode record bytes.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },
}

impl CodecError {
    /// Create an invalid key component error.
    pub fn invalid_component(component: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKeyComponent {
            component: component.into(),
            reason,
        }
    }

    /// Create a malformed key error.
    pub fn malformed_key(key: &str) -> Self {
        Self::MalformedKey {
            key: key.escape_debug().to_string(),
        }
    }

    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }
}
