//! Self-service workflows: account requests, top-ups, property listing
//! and purchase.

use crate::config::{RegistryConfig, TopUpTable};
use crate::context::InvocationContext;
use crate::entity::{
    property_key, property_request_key, user_key, user_ref, user_request_key, EntityKey,
    EntityKind, Property, PropertyRequest, PropertyStatus, User, UserRequest,
};
use crate::error::{RegistryError, RegistryResult};
use crate::repository::Repository;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Files a request for a new user account.
///
/// `created_at` is taken from the invocation timestamp.
///
/// # Errors
///
/// - `InvalidArgument` if `name` or `ssn` is empty
/// - `AlreadyExists` if the same `(name, ssn)` already has a pending request
pub fn create_user_request(
    repo: &mut Repository<'_, '_>,
    ctx: &InvocationContext,
    name: &str,
    email: &str,
    phone: &str,
    ssn: &str,
) -> RegistryResult<UserRequest> {
    if name.is_empty() || ssn.is_empty() {
        return Err(RegistryError::invalid_argument(
            "user name and ssn must not be empty",
        ));
    }

    let key = user_request_key(name, ssn)?;
    if repo.exists::<UserRequest>(&key)? {
        return Err(RegistryError::already_exists(EntityKind::UserRequest, &key));
    }

    let request = UserRequest {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        ssn: ssn.to_string(),
        created_at: ctx.timestamp.to_created_at()?,
    };
    repo.save(&key, &request)?;

    info!(%key, caller = %ctx.caller, "user request created");
    Ok(request)
}

/// Result of a successful top-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recharge {
    /// Amount credited.
    pub amount: u64,
    /// The account after the top-up.
    pub user: User,
}

impl fmt::Display for Recharge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account recharged with {} coins. Total balance: {}",
            self.amount, self.user.balance
        )
    }
}

/// Credits the account `(name, ssn)` with the amount `code` maps to in
/// `table`.
///
/// # Errors
///
/// - `NotFound` if the user does not exist
/// - `InvalidArgument` if `code` is not in the table or the balance would
///   overflow
pub fn recharge_account(
    repo: &mut Repository<'_, '_>,
    table: &TopUpTable,
    name: &str,
    ssn: &str,
    code: &str,
) -> RegistryResult<Recharge> {
    let key = user_key(name, ssn)?;
    let mut user: User = repo.load(&key)?;

    let amount = table
        .amount(code)
        .ok_or_else(|| RegistryError::invalid_argument(format!("unknown top-up code {code:?}")))?;
    user.balance = credit(user.balance, amount, &key)?;
    repo.save(&key, &user)?;

    info!(%key, amount, balance = user.balance, "account recharged");
    Ok(Recharge { amount, user })
}

/// Files a registration for property `prop_id` owned by `(owner_name, owner_ssn)`.
///
/// The request is stored under the bare property id with status
/// `registered`.
///
/// # Errors
///
/// - `InvalidArgument` if `price` is zero or `prop_id` is not a usable key
/// - `NotFound` if the owner is not an active user
/// - `AlreadyExists` if `prop_id` is pending or already registered
pub fn property_registration_request(
    repo: &mut Repository<'_, '_>,
    prop_id: &str,
    price: u64,
    owner_name: &str,
    owner_ssn: &str,
) -> RegistryResult<PropertyRequest> {
    let key = property_request_key(prop_id)?;
    if price == 0 {
        return Err(RegistryError::invalid_argument(
            "property price must be positive",
        ));
    }

    let owner = user_ref(owner_name, owner_ssn)?;
    let owner_key = EntityKey::from(owner.clone());
    if !repo.exists::<User>(&owner_key)? {
        return Err(RegistryError::not_found(EntityKind::User, &owner_key));
    }

    if repo.exists::<PropertyRequest>(&key)? {
        return Err(RegistryError::already_exists(EntityKind::PropertyRequest, &key));
    }
    let registered = property_key(prop_id)?;
    if repo.exists::<Property>(&registered)? {
        return Err(RegistryError::already_exists(EntityKind::Property, &registered));
    }

    let request = PropertyRequest {
        prop_id: prop_id.to_string(),
        owner,
        price,
        status: PropertyStatus::Registered,
    };
    repo.save(&key, &request)?;

    info!(%key, owner = %request.owner, price, "property registration requested");
    Ok(request)
}

/// Sets the listing status of `prop_id` on behalf of its owner.
///
/// # Errors
///
/// - `NotFound` if the property does not exist
/// - `PermissionDenied` if `(owner_name, owner_ssn)` is not the owner
/// - `InvalidArgument` if `status` is not `registered` or `onSale`
pub fn update_property(
    repo: &mut Repository<'_, '_>,
    prop_id: &str,
    status: &str,
    owner_name: &str,
    owner_ssn: &str,
) -> RegistryResult<Property> {
    let key = property_key(prop_id)?;
    let mut property: Property = repo.load(&key)?;

    let claimant = user_ref(owner_name, owner_ssn)?;
    if !property.is_owned_by(&claimant) {
        return Err(RegistryError::PermissionDenied {
            kind: EntityKind::Property,
            key: key.to_string(),
            claimant: claimant.to_string(),
        });
    }

    property.status = status.parse()?;
    repo.save(&key, &property)?;

    info!(%key, status = %property.status, "property updated");
    Ok(property)
}

/// Transfers `prop_id` to the buyer `(buyer_name, buyer_ssn)`.
///
/// The buyer is debited the price, becomes the owner and the property goes
/// back to `registered`. The previous owner is credited only when
/// [`RegistryConfig::credit_seller`] is set.
///
/// # Errors
///
/// Checked in this order:
/// - `NotFound` if the property does not exist
/// - `InvalidState` if the property is not on sale
/// - `NotFound` if the buyer does not exist
/// - `InsufficientFunds` if the buyer's balance is below the price
pub fn purchase_property(
    repo: &mut Repository<'_, '_>,
    config: &RegistryConfig,
    prop_id: &str,
    buyer_name: &str,
    buyer_ssn: &str,
) -> RegistryResult<Property> {
    let key = property_key(prop_id)?;
    let mut property: Property = repo.load(&key)?;
    if !property.is_on_sale() {
        return Err(RegistryError::InvalidState {
            kind: EntityKind::Property,
            key: key.to_string(),
            state: property.status.to_string(),
            message: "not listed for sale".to_string(),
        });
    }

    let buyer_ref = user_ref(buyer_name, buyer_ssn)?;
    let buyer_key = EntityKey::from(buyer_ref.clone());
    let mut buyer: User = repo.load(&buyer_key)?;
    if buyer.balance < property.price {
        return Err(RegistryError::InsufficientFunds {
            account: buyer_key.to_string(),
            balance: buyer.balance,
            required: property.price,
        });
    }

    let seller_ref = std::mem::replace(&mut property.owner, buyer_ref);
    buyer.balance -= property.price;
    property.status = PropertyStatus::Registered;

    if config.credit_seller {
        if seller_ref == property.owner {
            buyer.balance = credit(buyer.balance, property.price, &buyer_key)?;
        } else {
            let seller_key = EntityKey::from(seller_ref.clone());
            let mut seller: User = repo.load(&seller_key)?;
            seller.balance = credit(seller.balance, property.price, &seller_key)?;
            repo.save(&seller_key, &seller)?;
        }
    }

    repo.save(&buyer_key, &buyer)?;
    repo.save(&key, &property)?;

    info!(
        %key,
        seller = %seller_ref,
        buyer = %property.owner,
        price = property.price,
        "property purchased"
    );
    Ok(property)
}

fn credit(balance: u64, amount: u64, account: &EntityKey) -> RegistryResult<u64> {
    balance.checked_add(amount).ok_or_else(|| {
        RegistryError::invalid_argument(format!("balance of {account} would overflow"))
    })
}
