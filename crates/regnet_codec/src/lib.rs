//! # RegNet Codec
//!
//! Key addressing and record encoding for the RegNet ledger.
//!
//! ## Composite keys
//!
//! An [`ObjectKey`] is a namespace plus an ordered list of attribute
//! strings. It encodes to a single ledger key:
//!
//! ```text
//! U+0000 namespace U+0000 attr1 U+0000 attr2 U+0000 ...
//! ```
//!
//! - Identical inputs produce identical keys
//! - Different namespaces or attribute tuples never collide
//! - Swapping attributes changes the key
//! - Keys sharing a namespace share a prefix and sort together
//! - No case or whitespace normalization is applied
//!
//! Raw keys (used for legacy addressing) may not begin with `U+0000`, so
//! they cannot collide with composite keys either.
//!
//! ## Records
//!
//! Records are serde types encoded as CBOR maps with named fields, so
//! saved bytes are self-describing and round-trip losslessly.
//!
//! ## Usage
//!
//! ```
//! use regnet_codec::ObjectKey;
//!
//! let key = ObjectKey::new("user", ["Alice", "SSN1"]).unwrap();
//! let encoded = key.encode();
//! assert_eq!(encoded, "\u{0}user\u{0}Alice\u{0}SSN1\u{0}");
//! assert_eq!(ObjectKey::parse(&encoded).unwrap(), key);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod key;
mod record;

pub use error::{CodecError, CodecResult};
pub use key::{validate_raw_key, ObjectKey, KEY_DELIMITER};
pub use record::{decode_record, encode_record};
