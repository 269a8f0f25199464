//! Named operations and their dispatch.
//!
//! The nine operations are grouped into two contracts, `regnet.user` and
//! `regnet.registrar`. A call such as `regnet.user:purchaseProperty P1 Bob SSN2`
//! is parsed into an [`Operation`] with [`Operation::from_call`] and run with
//! [`crate::Registry::invoke`].

use crate::entity::{Property, PropertyRequest, User, UserRequest};
use crate::error::{RegistryError, RegistryResult};
use crate::workflow::user::Recharge;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A group of operations exposed under one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contract {
    /// Self-service operations.
    User,
    /// Approval operations.
    Registrar,
}

impl Contract {
    /// All contracts.
    pub const ALL: [Contract; 2] = [Contract::User, Contract::Registrar];

    /// Returns the contract name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "regnet.user",
            Self::Registrar => "regnet.registrar",
        }
    }

    /// Returns the functions this contract exposes.
    #[must_use]
    pub const fn functions(self) -> &'static [&'static str] {
        match self {
            Self::User => &[
                "createUserRequest",
                "rechargeAccount",
                "viewUser",
                "propertyRegistrationRequest",
                "viewProperty",
                "updateProperty",
                "purchaseProperty",
            ],
            Self::Registrar => &[
                "approveNewUser",
                "viewUser",
                "approvePropertyRequest",
                "viewProperty",
            ],
        }
    }

    /// Returns true if `function` is exposed by this contract.
    #[must_use]
    pub fn exposes(self, function: &str) -> bool {
        self.functions().contains(&function)
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Contract {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| RegistryError::invalid_argument(format!("unknown contract {s:?}")))
    }
}

/// One invocable operation with its arguments.
///
/// Serializes with the function name under `"function"`, e.g.
/// `{"function": "viewProperty", "propId": "P1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "camelCase")]
pub enum Operation {
    /// File a user account request.
    #[serde(rename_all = "camelCase")]
    CreateUserRequest {
        /// Applicant name.
        name: String,
        /// Contact email.
        email: String,
        /// Contact phone.
        phone: String,
        /// Social security number.
        ssn: String,
    },
    /// Approve a pending user request.
    #[serde(rename_all = "camelCase")]
    ApproveNewUser {
        /// Applicant name.
        name: String,
        /// Applicant ssn.
        ssn: String,
    },
    /// Top up a user balance.
    #[serde(rename_all = "camelCase")]
    RechargeAccount {
        /// Account holder name.
        name: String,
        /// Account holder ssn.
        ssn: String,
        /// Code looked up in the top-up table.
        top_up_code: String,
    },
    /// Read a user.
    #[serde(rename_all = "camelCase")]
    ViewUser {
        /// User name.
        name: String,
        /// User ssn.
        ssn: String,
    },
    /// File a property registration.
    #[serde(rename_all = "camelCase")]
    PropertyRegistrationRequest {
        /// Property identifier, used as a raw ledger key.
        prop_id: String,
        /// Asking price in coins.
        price: u64,
        /// Owner name.
        owner_name: String,
        /// Owner ssn.
        owner_ssn: String,
    },
    /// Approve a pending property registration.
    #[serde(rename_all = "camelCase")]
    ApprovePropertyRequest {
        /// Property identifier.
        prop_id: String,
    },
    /// Read a property.
    #[serde(rename_all = "camelCase")]
    ViewProperty {
        /// Property identifier.
        prop_id: String,
    },
    /// Change a property's listing status.
    #[serde(rename_all = "camelCase")]
    UpdateProperty {
        /// Property identifier.
        prop_id: String,
        /// `registered` or `onSale`.
        status: String,
        /// Caller's name, checked against the owner.
        owner_name: String,
        /// Caller's ssn, checked against the owner.
        owner_ssn: String,
    },
    /// Buy a listed property.
    #[serde(rename_all = "camelCase")]
    PurchaseProperty {
        /// Property identifier.
        prop_id: String,
        /// Buyer name.
        buyer_name: String,
        /// Buyer ssn.
        buyer_ssn: String,
    },
}

impl Operation {
    /// Returns the function name, e.g. `approveNewUser`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateUserRequest { .. } => "createUserRequest",
            Self::ApproveNewUser { .. } => "approveNewUser",
            Self::RechargeAccount { .. } => "rechargeAccount",
            Self::ViewUser { .. } => "viewUser",
            Self::PropertyRegistrationRequest { .. } => "propertyRegistrationRequest",
            Self::ApprovePropertyRequest { .. } => "approvePropertyRequest",
            Self::ViewProperty { .. } => "viewProperty",
            Self::UpdateProperty { .. } => "updateProperty",
            Self::PurchaseProperty { .. } => "purchaseProperty",
        }
    }

    /// Returns the contract the operation belongs to.
    ///
    /// The two views are exposed by both contracts and report
    /// [`Contract::User`].
    #[must_use]
    pub const fn contract(&self) -> Contract {
        match self {
            Self::ApproveNewUser { .. } | Self::ApprovePropertyRequest { .. } => {
                Contract::Registrar
            }
            _ => Contract::User,
        }
    }

    /// Returns true if the operation never writes.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(self, Self::ViewUser { .. } | Self::ViewProperty { .. })
    }

    /// Parses a `contract:function` call with positional arguments.
    ///
    /// The contract prefix is optional; when given, the function must be
    /// exposed by that contract. Arguments follow the order of the
    /// operation's fields.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error for an unknown contract or
    /// function, a wrong argument count, or a price that is not an
    /// unsigned integer.
    pub fn from_call(call: &str, args: &[String]) -> RegistryResult<Self> {
        let function = match call.split_once(':') {
            Some((contract, function)) => {
                let contract: Contract = contract.parse()?;
                if !contract.exposes(function) {
                    return Err(RegistryError::invalid_argument(format!(
                        "contract {contract} has no function {function:?}"
                    )));
                }
                function
            }
            None => call,
        };

        let op = match function {
            "createUserRequest" => {
                let [name, email, phone, ssn] = positional::<4>(function, args)?;
                Self::CreateUserRequest {
                    name: name.clone(),
                    email: email.clone(),
                    phone: phone.clone(),
                    ssn: ssn.clone(),
                }
            }
            "approveNewUser" => {
                let [name, ssn] = positional::<2>(function, args)?;
                Self::ApproveNewUser {
                    name: name.clone(),
                    ssn: ssn.clone(),
                }
            }
            "rechargeAccount" => {
                let [name, ssn, code] = positional::<3>(function, args)?;
                Self::RechargeAccount {
                    name: name.clone(),
                    ssn: ssn.clone(),
                    top_up_code: code.clone(),
                }
            }
            "viewUser" => {
                let [name, ssn] = positional::<2>(function, args)?;
                Self::ViewUser {
                    name: name.clone(),
                    ssn: ssn.clone(),
                }
            }
            "propertyRegistrationRequest" => {
                let [prop_id, price, owner_name, owner_ssn] = positional::<4>(function, args)?;
                Self::PropertyRegistrationRequest {
                    prop_id: prop_id.clone(),
                    price: parse_price(price)?,
                    owner_name: owner_name.clone(),
                    owner_ssn: owner_ssn.clone(),
                }
            }
            "approvePropertyRequest" => {
                let [prop_id] = positional::<1>(function, args)?;
                Self::ApprovePropertyRequest {
                    prop_id: prop_id.clone(),
                }
            }
            "viewProperty" => {
                let [prop_id] = positional::<1>(function, args)?;
                Self::ViewProperty {
                    prop_id: prop_id.clone(),
                }
            }
            "updateProperty" => {
                let [prop_id, status, owner_name, owner_ssn] = positional::<4>(function, args)?;
                Self::UpdateProperty {
                    prop_id: prop_id.clone(),
                    status: status.clone(),
                    owner_name: owner_name.clone(),
                    owner_ssn: owner_ssn.clone(),
                }
            }
            "purchaseProperty" => {
                let [prop_id, buyer_name, buyer_ssn] = positional::<3>(function, args)?;
                Self::PurchaseProperty {
                    prop_id: prop_id.clone(),
                    buyer_name: buyer_name.clone(),
                    buyer_ssn: buyer_ssn.clone(),
                }
            }
            other => {
                return Err(RegistryError::invalid_argument(format!(
                    "unknown function {other:?}"
                )))
            }
        };
        Ok(op)
    }
}

fn positional<'a, const N: usize>(
    function: &str,
    args: &'a [String],
) -> RegistryResult<&'a [String; N]> {
    args.try_into().map_err(|_| {
        RegistryError::invalid_argument(format!(
            "{function} takes {N} arguments, got {}",
            args.len()
        ))
    })
}

fn parse_price(raw: &str) -> RegistryResult<u64> {
    raw.parse()
        .map_err(|_| RegistryError::invalid_argument(format!("price {raw:?} is not an unsigned integer")))
}

/// What an operation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// A newly filed user request.
    UserRequest(UserRequest),
    /// An active user.
    User(User),
    /// A completed top-up.
    Recharge(Recharge),
    /// A newly filed property registration.
    PropertyRequest(PropertyRequest),
    /// A registered property.
    Property(Property),
}

impl Outcome {
    /// Returns the human-readable confirmation for a top-up, if this is one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Recharge(recharge) => Some(recharge.to_string()),
            _ => None,
        }
    }
}
