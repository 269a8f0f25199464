//! End-to-end registry scenarios.

use regnet_core::entity::user_ref;
use regnet_core::{ErrorKind, PropertyStatus, RegistryConfig, RegistryError};
use regnet_storage::LedgerStore;
use regnet_testkit::prelude::*;

#[test]
fn alice_sells_to_bob() {
    let registry = TestRegistry::memory();

    let request = registry
        .create_user_request(&registry.ctx(), "Alice", "a@x.com", "555", "SSN1")
        .unwrap();
    assert_eq!(request.name, "Alice");

    let alice = registry
        .approve_new_user(&registry.ctx(), "Alice", "SSN1")
        .unwrap();
    assert_eq!(alice.balance, 0);
    assert_eq!(alice.created_at, request.created_at);

    let recharge = registry
        .recharge_account(&registry.ctx(), "Alice", "SSN1", "upg500")
        .unwrap();
    assert_eq!(recharge.user.balance, 500);

    registry
        .property_registration_request(&registry.ctx(), "P1", 300, "Alice", "SSN1")
        .unwrap();
    let property = registry
        .approve_property_request(&registry.ctx(), "P1")
        .unwrap();
    assert_eq!(property.status, PropertyStatus::Registered);

    let property = registry
        .update_property(&registry.ctx(), "P1", "onSale", "Alice", "SSN1")
        .unwrap();
    assert_eq!(property.status, PropertyStatus::OnSale);

    registry.onboard("Bob", "SSN2");
    registry.fund("Bob", "SSN2", 1000);

    let property = registry
        .purchase_property(&registry.ctx(), "P1", "Bob", "SSN2")
        .unwrap();
    assert_eq!(property.owner, user_ref("Bob", "SSN2").unwrap());
    assert_eq!(property.status, PropertyStatus::Registered);
    assert_eq!(registry.balance("Bob", "SSN2"), 700);
    // the seller is not credited by default
    assert_eq!(registry.balance("Alice", "SSN1"), 500);

    let stored = registry.view_property(&registry.ctx(), "P1").unwrap();
    assert_eq!(stored, property);
}

#[test]
fn purchase_of_unlisted_property_mutates_nothing() {
    let registry = TestRegistry::memory();
    registry.onboard("Alice", "SSN1");
    registry.onboard("Bob", "SSN2");
    registry.fund("Bob", "SSN2", 1000);
    registry.register_property("P1", 300, "Alice", "SSN1");
    let before = registry.store().snapshot();

    let err = registry
        .purchase_property(&registry.ctx(), "P1", "Bob", "SSN2")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(registry.store().snapshot(), before);
}

#[test]
fn insufficient_funds_leaves_ledger_byte_identical() {
    let registry = scenarios::market();
    registry.fund("Bob", "SSN2", 299);
    let before = registry.store().snapshot().to_cbor().unwrap();

    let err = registry
        .purchase_property(&registry.ctx(), "P1", "Bob", "SSN2")
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InsufficientFunds {
            balance: 299,
            required: 300,
            ..
        }
    ));
    assert_eq!(registry.store().snapshot().to_cbor().unwrap(), before);
}

#[test]
fn stranger_cannot_delist() {
    let registry = scenarios::market();
    let before = registry.view_property(&registry.ctx(), "P1").unwrap();

    let err = registry
        .update_property(&registry.ctx(), "P1", "registered", "Bob", "SSN2")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(registry.view_property(&registry.ctx(), "P1").unwrap(), before);
}

#[test]
fn owner_check_uses_both_name_and_ssn() {
    let registry = scenarios::market();
    for (name, ssn) in [("Alice", "SSN2"), ("alice", "SSN1"), ("Alice ", "SSN1")] {
        let err = registry
            .update_property(&registry.ctx(), "P1", "registered", name, ssn)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied, "{name:?}/{ssn:?}");
    }
}

#[test]
fn resale_after_purchase() {
    let registry = scenarios::market();
    registry
        .purchase_property(&registry.ctx(), "P1", "Bob", "SSN2")
        .unwrap();

    // the previous owner has lost control of the listing
    let err = registry
        .update_property(&registry.ctx(), "P1", "onSale", "Alice", "SSN1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);

    registry
        .update_property(&registry.ctx(), "P1", "onSale", "Bob", "SSN2")
        .unwrap();
    registry.fund("Alice", "SSN1", 300);
    let property = registry
        .purchase_property(&registry.ctx(), "P1", "Alice", "SSN1")
        .unwrap();

    assert_eq!(property.owner, user_ref("Alice", "SSN1").unwrap());
    assert_eq!(registry.balance("Alice", "SSN1"), 0);
    assert_eq!(registry.balance("Bob", "SSN2"), 700);
}

#[test]
fn seller_credit_is_opt_in() {
    let registry =
        TestRegistry::memory_with_config(RegistryConfig::new().credit_seller(true));
    registry.onboard("Alice", "SSN1");
    registry.onboard("Bob", "SSN2");
    registry.fund("Bob", "SSN2", 1000);
    registry.list_property("P1", 300, "Alice", "SSN1");

    registry
        .purchase_property(&registry.ctx(), "P1", "Bob", "SSN2")
        .unwrap();
    assert_eq!(registry.balance("Bob", "SSN2"), 700);
    assert_eq!(registry.balance("Alice", "SSN1"), 300);
}

#[test]
fn request_is_retired_on_approval() {
    let registry = TestRegistry::memory();
    registry.onboard("Alice", "SSN1");

    // approving twice finds no request the second time
    let err = registry
        .approve_new_user(&registry.ctx(), "Alice", "SSN1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // a fresh request for an active user cannot be approved
    registry
        .create_user_request(&registry.ctx(), "Alice", "new@x.com", "1", "SSN1")
        .unwrap();
    let err = registry
        .approve_new_user(&registry.ctx(), "Alice", "SSN1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(
        registry
            .view_user(&registry.ctx(), "Alice", "SSN1")
            .unwrap()
            .email,
        "alice@example.com"
    );
}

#[test]
fn property_request_is_raw_keyed() {
    let registry = TestRegistry::memory();
    registry.onboard("Alice", "SSN1");
    registry
        .property_registration_request(&registry.ctx(), "P1", 300, "Alice", "SSN1")
        .unwrap();

    assert!(registry.store().read("P1").unwrap().is_some());
    registry
        .approve_property_request(&registry.ctx(), "P1")
        .unwrap();
    assert!(registry.store().read("P1").unwrap().is_none());
}

#[test]
fn failed_operations_do_not_advance_height() {
    let registry = scenarios::market();
    let height = registry.store().height().unwrap();

    let failures = [
        registry
            .recharge_account(&registry.ctx(), "Alice", "SSN1", "free-money")
            .map(|_| ()),
        registry
            .approve_property_request(&registry.ctx(), "P9")
            .map(|_| ()),
        registry
            .update_property(&registry.ctx(), "P1", "sold", "Alice", "SSN1")
            .map(|_| ()),
        registry
            .purchase_property(&registry.ctx(), "P1", "Mallory", "SSN9")
            .map(|_| ()),
    ];

    assert!(failures.iter().all(Result::is_err));
    assert_eq!(registry.store().height().unwrap(), height);
}
