//! Property-based test generators using proptest.
//!
//! Provides strategies for generating registry entities whose fields are
//! valid key components.

use proptest::prelude::*;
use regnet_core::entity::user_ref;
use regnet_core::{Property, PropertyRequest, PropertyStatus, TopUpTable, User, UserRequest};

/// Strategy for generating user names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{1,11}( [A-Z][a-z]{1,11})?").expect("Invalid regex")
}

/// Strategy for generating social security numbers.
pub fn ssn_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{3}-[0-9]{2}-[0-9]{4}").expect("Invalid regex")
}

/// Strategy for generating email addresses.
pub fn email_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,10}@[a-z]{1,8}\\.(com|org|net)").expect("Invalid regex")
}

/// Strategy for generating phone numbers.
pub fn phone_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("\\+?[0-9]{7,12}").expect("Invalid regex")
}

/// Strategy for generating RFC 3339 creation times.
pub fn created_at_strategy() -> impl Strategy<Value = String> {
    (0i64..4_102_444_800).prop_map(|secs| {
        regnet_core::TxTimestamp::from_seconds(secs)
            .to_created_at()
            .expect("Timestamp in range")
    })
}

/// Strategy for generating property identifiers usable as raw keys.
pub fn prop_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z]{1,3}-?[0-9]{1,6}").expect("Invalid regex")
}

/// Strategy for generating positive prices.
pub fn price_strategy() -> impl Strategy<Value = u64> {
    1u64..=1_000_000
}

/// Strategy for generating property statuses.
pub fn status_strategy() -> impl Strategy<Value = PropertyStatus> {
    prop_oneof![Just(PropertyStatus::Registered), Just(PropertyStatus::OnSale)]
}

/// Strategy for generating status strings outside the accepted set.
pub fn invalid_status_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,12}".prop_filter("Must not be a valid status", |s| {
        s.parse::<PropertyStatus>().is_err()
    })
}

/// Strategy for generating codes from the default top-up table.
pub fn top_up_code_strategy() -> impl Strategy<Value = String> {
    let codes: Vec<String> = TopUpTable::default()
        .iter()
        .map(|(code, _)| code.to_string())
        .collect();
    prop::sample::select(codes)
}

/// Strategy for generating codes the default top-up table rejects.
pub fn unknown_top_up_code_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,10}".prop_filter("Must not be a known code", |code| {
        TopUpTable::default().amount(code).is_none()
    })
}

/// Strategy for generating pending user requests.
pub fn user_request_strategy() -> impl Strategy<Value = UserRequest> {
    (
        name_strategy(),
        email_strategy(),
        phone_strategy(),
        ssn_strategy(),
        created_at_strategy(),
    )
        .prop_map(|(name, email, phone, ssn, created_at)| UserRequest {
            name,
            email,
            phone,
            ssn,
            created_at,
        })
}

/// Strategy for generating active users with any balance.
pub fn user_strategy() -> impl Strategy<Value = User> {
    (user_request_strategy(), any::<u64>()).prop_map(|(request, balance)| User {
        balance,
        ..User::from_request(request)
    })
}

/// Strategy for generating property registrations.
pub fn property_request_strategy() -> impl Strategy<Value = PropertyRequest> {
    (
        prop_id_strategy(),
        name_strategy(),
        ssn_strategy(),
        price_strategy(),
        status_strategy(),
    )
        .prop_map(|(prop_id, owner_name, owner_ssn, price, status)| PropertyRequest {
            prop_id,
            owner: user_ref(&owner_name, &owner_ssn).expect("Valid owner"),
            price,
            status,
        })
}

/// Strategy for generating registered properties.
pub fn property_strategy() -> impl Strategy<Value = Property> {
    property_request_strategy().prop_map(Property::from_request)
}
