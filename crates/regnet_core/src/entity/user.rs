//! User account records.

use serde::{Deserialize, Serialize};

/// A pending request for a user account.
///
/// Lives only until a registrar approves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Account holder name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Social security number.
    pub ssn: String,
    /// RFC 3339 time the request was submitted.
    pub created_at: String,
}

/// An active user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account holder name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Social security number.
    pub ssn: String,
    /// RFC 3339 time the original request was submitted.
    pub created_at: String,
    /// Spendable balance.
    pub balance: u64,
}

impl User {
    /// Promotes an approved request into an account with zero balance.
    #[must_use]
    pub fn from_request(request: UserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone: request.phone,
            ssn: request.ssn,
            created_at: request.created_at,
            balance: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_request_copies_fields_with_zero_balance() {
        let request = UserRequest {
            name: "Alice".into(),
            email: "a@x.com".into(),
            phone: "555".into(),
            ssn: "SSN1".into(),
            created_at: "2023-11-14T22:13:20.000Z".into(),
        };

        let user = User::from_request(request.clone());
        assert_eq!(user.name, request.name);
        assert_eq!(user.email, request.email);
        assert_eq!(user.phone, request.phone);
        assert_eq!(user.ssn, request.ssn);
        assert_eq!(user.created_at, request.created_at);
        assert_eq!(user.balance, 0);
    }
}
