//! Property title records.

use crate::error::RegistryError;
use regnet_codec::ObjectKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listing status of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyStatus {
    /// Held by its owner, not for sale.
    #[serde(rename = "registered")]
    Registered,
    /// Listed and open to purchase.
    #[serde(rename = "onSale")]
    OnSale,
}

impl PropertyStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::OnSale => "onSale",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "onSale" => Ok(Self::OnSale),
            other => Err(RegistryError::invalid_argument(format!(
                "unknown property status {other:?}, expected \"registered\" or \"onSale\""
            ))),
        }
    }
}

/// A pending property registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    /// Property identifier.
    pub prop_id: String,
    /// Reference to the owning user.
    pub owner: ObjectKey,
    /// Asking price, always positive.
    pub price: u64,
    /// Status the property will carry once approved.
    pub status: PropertyStatus,
}

/// A registered property title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Property identifier.
    pub prop_id: String,
    /// Reference to the owning user.
    pub owner: ObjectKey,
    /// Price, always positive.
    pub price: u64,
    /// Current listing status.
    pub status: PropertyStatus,
}

impl Property {
    /// Promotes an approved registration into a title.
    #[must_use]
    pub fn from_request(request: PropertyRequest) -> Self {
        Self {
            prop_id: request.prop_id,
            owner: request.owner,
            price: request.price,
            status: request.status,
        }
    }

    /// Returns true if the property can be purchased.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.status == PropertyStatus::OnSale
    }

    /// Returns true if `user` is the recorded owner.
    #[must_use]
    pub fn is_owned_by(&self, user: &ObjectKey) -> bool {
        &self.owner == user
    }
}
