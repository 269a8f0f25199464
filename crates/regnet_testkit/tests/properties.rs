//! Property-based tests over registry operations.

use proptest::prelude::*;
use regnet_core::entity::{
    property_key, property_request_key, user_key, user_ref, user_request_key,
};
use regnet_core::{ErrorKind, PropertyStatus, Repository, TopUpTable};
use regnet_storage::{InMemoryLedger, Invocation};
use regnet_testkit::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig::with_cases(64)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn approval_requires_request_and_no_user(
        name in name_strategy(),
        ssn in ssn_strategy(),
        requested in any::<bool>(),
        already_active in any::<bool>(),
    ) {
        let registry = TestRegistry::memory();
        if already_active {
            registry.onboard(&name, &ssn);
        }
        if requested {
            registry
                .create_user_request(&registry.ctx(), &name, "e@x.com", "1", &ssn)
                .unwrap();
        }

        let result = registry.approve_new_user(&registry.ctx(), &name, &ssn);
        match (requested, already_active) {
            (true, false) => {
                let user = result.unwrap();
                prop_assert_eq!(user.balance, 0);
                let ledger = registry.store();
                let mut inv = Invocation::begin(&**ledger);
                let mut repo = Repository::new(&mut inv);
                prop_assert!(!repo
                    .exists::<regnet_core::UserRequest>(&user_request_key(&name, &ssn).unwrap())
                    .unwrap());
                prop_assert!(repo
                    .exists::<regnet_core::User>(&user_key(&name, &ssn).unwrap())
                    .unwrap());
            }
            (false, _) => prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound),
            (true, true) => prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::AlreadyExists),
        }
    }

    #[test]
    fn recharge_adds_exactly_the_table_amount(
        code in top_up_code_strategy(),
        start in 0u64..1_000_000,
    ) {
        let registry = TestRegistry::memory();
        registry.onboard("Alice", "SSN1");
        registry.fund("Alice", "SSN1", start);

        let recharge = registry
            .recharge_account(&registry.ctx(), "Alice", "SSN1", &code)
            .unwrap();
        let amount = TopUpTable::default().amount(&code).unwrap();
        prop_assert_eq!(recharge.amount, amount);
        prop_assert_eq!(registry.balance("Alice", "SSN1"), start + amount);
    }

    #[test]
    fn recharge_rejects_codes_outside_the_table(code in unknown_top_up_code_strategy()) {
        let registry = TestRegistry::memory();
        registry.onboard("Alice", "SSN1");

        let err = registry
            .recharge_account(&registry.ctx(), "Alice", "SSN1", &code)
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(registry.balance("Alice", "SSN1"), 0);
    }

    #[test]
    fn unlisted_purchase_is_invalid_state_for_any_balance(
        price in price_strategy(),
        balance in any::<u64>(),
    ) {
        let registry = TestRegistry::memory();
        registry.onboard("Alice", "SSN1");
        registry.onboard("Bob", "SSN2");
        registry.fund("Bob", "SSN2", balance);
        registry.register_property("P1", price, "Alice", "SSN1");

        let err = registry
            .purchase_property(&registry.ctx(), "P1", "Bob", "SSN2")
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidState);
        prop_assert_eq!(registry.balance("Bob", "SSN2"), balance);
    }

    #[test]
    fn purchase_is_all_or_nothing(
        price in price_strategy(),
        balance in 0u64..2_000_000,
    ) {
        let registry = TestRegistry::memory();
        registry.onboard("Alice", "SSN1");
        registry.onboard("Bob", "SSN2");
        registry.fund("Bob", "SSN2", balance);
        registry.list_property("P1", price, "Alice", "SSN1");
        let before = registry.store().snapshot();

        let result = registry.purchase_property(&registry.ctx(), "P1", "Bob", "SSN2");
        let property = registry.view_property(&registry.ctx(), "P1").unwrap();
        let bob = registry.balance("Bob", "SSN2");

        if balance >= price {
            prop_assert!(result.is_ok());
            prop_assert_eq!(property.owner, user_ref("Bob", "SSN2").unwrap());
            prop_assert_eq!(property.status, PropertyStatus::Registered);
            prop_assert_eq!(bob, balance - price);
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InsufficientFunds);
            prop_assert_eq!(registry.store().snapshot(), before);
            prop_assert_eq!(property.owner, user_ref("Alice", "SSN1").unwrap());
            prop_assert_eq!(bob, balance);
        }
    }

    #[test]
    fn non_owner_update_is_denied(
        status in status_strategy(),
        name in name_strategy(),
        ssn in ssn_strategy(),
    ) {
        prop_assume!(name != "Alice" || ssn != "SSN1");
        let registry = TestRegistry::memory();
        registry.onboard("Alice", "SSN1");
        let before = registry.register_property("P1", 100, "Alice", "SSN1");

        let err = registry
            .update_property(&registry.ctx(), "P1", status.as_str(), &name, &ssn)
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        prop_assert_eq!(registry.view_property(&registry.ctx(), "P1").unwrap(), before);
    }

    #[test]
    fn unknown_status_is_rejected(status in invalid_status_strategy()) {
        let registry = TestRegistry::memory();
        registry.onboard("Alice", "SSN1");
        registry.register_property("P1", 100, "Alice", "SSN1");

        let err = registry
            .update_property(&registry.ctx(), "P1", &status, "Alice", "SSN1")
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn records_round_trip_through_the_ledger(
        request in user_request_strategy(),
        user in user_strategy(),
        property_request in property_request_strategy(),
        property in property_strategy(),
    ) {
        let ledger = InMemoryLedger::new();
        let mut inv = Invocation::begin(&ledger);
        let mut repo = Repository::new(&mut inv);

        let request_key = user_request_key(&request.name, &request.ssn).unwrap();
        let key = user_key(&user.name, &user.ssn).unwrap();
        let pending_key = property_request_key(&property_request.prop_id).unwrap();
        let title_key = property_key(&property.prop_id).unwrap();

        repo.save(&request_key, &request).unwrap();
        repo.save(&key, &user).unwrap();
        repo.save(&pending_key, &property_request).unwrap();
        repo.save(&title_key, &property).unwrap();
        drop(repo);
        inv.commit().unwrap();

        let mut inv = Invocation::begin(&ledger);
        let mut repo = Repository::new(&mut inv);
        prop_assert_eq!(repo.load::<regnet_core::UserRequest>(&request_key).unwrap(), request);
        prop_assert_eq!(repo.load::<regnet_core::User>(&key).unwrap(), user);
        prop_assert_eq!(
            repo.load::<regnet_core::PropertyRequest>(&pending_key).unwrap(),
            property_request
        );
        prop_assert_eq!(repo.load::<regnet_core::Property>(&title_key).unwrap(), property);
    }
}
