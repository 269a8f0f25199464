//! Registrar workflows: promote pending requests and view active entities.
//!
//! Lifecycle handled here is `Requested -> Active` for both users and
//! properties. Approval is the only way either becomes active.

use crate::entity::{
    property_key, property_request_key, user_key, user_request_key, EntityKind, Property,
    PropertyRequest, User, UserRequest,
};
use crate::error::{RegistryError, RegistryResult};
use crate::repository::Repository;
use tracing::info;

/// Approves the pending request of `(name, ssn)`, creating the user.
///
/// The user starts with a zero balance and the request is deleted.
///
/// # Errors
///
/// - `NotFound` if no request exists
/// - `AlreadyExists` if the user is already active
pub fn approve_new_user(
    repo: &mut Repository<'_, '_>,
    name: &str,
    ssn: &str,
) -> RegistryResult<User> {
    let request_key = user_request_key(name, ssn)?;
    let request: UserRequest = repo.load(&request_key)?;

    let key = user_key(name, ssn)?;
    if repo.exists::<User>(&key)? {
        return Err(RegistryError::already_exists(EntityKind::User, &key));
    }

    let user = User::from_request(request);
    repo.save(&key, &user)?;
    repo.remove::<UserRequest>(&request_key)?;

    info!(%key, "user approved");
    Ok(user)
}

/// Returns the active user `(name, ssn)`.
///
/// # Errors
///
/// `NotFound` if the user does not exist.
pub fn view_user(repo: &mut Repository<'_, '_>, name: &str, ssn: &str) -> RegistryResult<User> {
    repo.load(&user_key(name, ssn)?)
}

/// Approves the pending registration of `prop_id`, creating the property.
///
/// Owner, price and status are copied from the request, which is deleted.
///
/// # Errors
///
/// - `NotFound` if no registration is pending
/// - `AlreadyExists` if a property with this id is already registered
pub fn approve_property_request(
    repo: &mut Repository<'_, '_>,
    prop_id: &str,
) -> RegistryResult<Property> {
    let request_key = property_request_key(prop_id)?;
    let request: PropertyRequest = repo.load(&request_key)?;

    let key = property_key(prop_id)?;
    if repo.exists::<Property>(&key)? {
        return Err(RegistryError::already_exists(EntityKind::Property, &key));
    }

    let property = Property::from_request(request);
    repo.save(&key, &property)?;
    repo.remove::<PropertyRequest>(&request_key)?;

    info!(%key, owner = %property.owner, "property approved");
    Ok(property)
}

/// Returns the registered property `prop_id`.
///
/// # Errors
///
/// `NotFound` if the property does not exist.
pub fn view_property(repo: &mut Repository<'_, '_>, prop_id: &str) -> RegistryResult<Property> {
    repo.load(&property_key(prop_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{user_ref, PropertyStatus};
    use crate::workflow::testing::{ctx, run};
    use crate::workflow::user::{create_user_request, property_registration_request};
    use regnet_storage::InMemoryLedger;

    fn requested(ledger: &InMemoryLedger, name: &str, ssn: &str) {
        run(ledger, |repo| {
            create_user_request(repo, &ctx(), name, "e@x.com", "555", ssn)
        })
        .unwrap();
    }

    #[test]
    fn approve_creates_user_and_retires_request() {
        let ledger = InMemoryLedger::new();
        requested(&ledger, "Alice", "SSN1");

        let user = run(&ledger, |repo| approve_new_user(repo, "Alice", "SSN1")).unwrap();
        assert_eq!(user.balance, 0);
        assert_eq!(user.email, "e@x.com");
        assert_eq!(user.created_at, "2023-11-14T22:13:20.000Z");

        run(&ledger, |repo| {
            assert!(!repo.exists::<UserRequest>(&user_request_key("Alice", "SSN1")?)?);
            assert_eq!(view_user(repo, "Alice", "SSN1")?, user);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn approve_without_request_is_not_found() {
        let ledger = InMemoryLedger::new();
        let err = run(&ledger, |repo| approve_new_user(repo, "Alice", "SSN1")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NotFound {
                kind: EntityKind::UserRequest,
                ..
            }
        ));
    }

    #[test]
    fn approve_existing_user_is_already_exists() {
        let ledger = InMemoryLedger::new();
        requested(&ledger, "Alice", "SSN1");
        run(&ledger, |repo| approve_new_user(repo, "Alice", "SSN1")).unwrap();
        requested(&ledger, "Alice", "SSN1");

        let err = run(&ledger, |repo| approve_new_user(repo, "Alice", "SSN1")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::AlreadyExists {
                kind: EntityKind::User,
                ..
            }
        ));

        // the second request is left pending
        run(&ledger, |repo| {
            assert!(repo.exists::<UserRequest>(&user_request_key("Alice", "SSN1")?)?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn view_missing_user_is_not_found() {
        let ledger = InMemoryLedger::new();
        let err = run(&ledger, |repo| view_user(repo, "Ghost", "0")).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn approve_property_copies_request() {
        let ledger = InMemoryLedger::new();
        requested(&ledger, "Alice", "SSN1");
        run(&ledger, |repo| approve_new_user(repo, "Alice", "SSN1")).unwrap();
        run(&ledger, |repo| {
            property_registration_request(repo, "P1", 300, "Alice", "SSN1")
        })
        .unwrap();

        let property = run(&ledger, |repo| approve_property_request(repo, "P1")).unwrap();
        assert_eq!(property.prop_id, "P1");
        assert_eq!(property.owner, user_ref("Alice", "SSN1").unwrap());
        assert_eq!(property.price, 300);
        assert_eq!(property.status, PropertyStatus::Registered);

        run(&ledger, |repo| {
            assert!(!repo.exists::<PropertyRequest>(&property_request_key("P1")?)?);
            assert_eq!(view_property(repo, "P1")?, property);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn approve_missing_property_request_is_not_found() {
        let ledger = InMemoryLedger::new();
        let err = run(&ledger, |repo| approve_property_request(repo, "P9")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NotFound {
                kind: EntityKind::PropertyRequest,
                ..
            }
        ));
    }

    #[test]
    fn approve_over_registered_property_is_already_exists() {
        let ledger = InMemoryLedger::new();
        let owner = user_ref("Alice", "SSN1").unwrap();
        run(&ledger, |repo| {
            let existing = Property {
                prop_id: "P1".into(),
                owner: owner.clone(),
                price: 100,
                status: PropertyStatus::OnSale,
            };
            repo.save(&property_key("P1")?, &existing)?;
            let request = PropertyRequest {
                prop_id: "P1".into(),
                owner: user_ref("Mallory", "SSN9")?,
                price: 1,
                status: PropertyStatus::Registered,
            };
            repo.save(&property_request_key("P1")?, &request)
        })
        .unwrap();

        let err = run(&ledger, |repo| approve_property_request(repo, "P1")).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::AlreadyExists {
                kind: EntityKind::Property,
                ..
            }
        ));
        let still = run(&ledger, |repo| view_property(repo, "P1")).unwrap();
        assert_eq!(still.owner, owner);
    }
}
