//! The registry facade.
//!
//! [`Registry`] runs every operation as one invocation against its ledger:
//! begin, run the workflow, then commit on success or abort on error.

use crate::config::RegistryConfig;
use crate::context::InvocationContext;
use crate::entity::{Property, PropertyRequest, User, UserRequest};
use crate::error::RegistryResult;
use crate::operation::{Operation, Outcome};
use crate::repository::Repository;
use crate::workflow::user::Recharge;
use crate::workflow::{registrar, user};
use regnet_storage::{Invocation, LedgerStore};
use std::sync::Arc;
use tracing::{debug, info_span, warn};

/// Entry point for all registry operations.
///
/// Holds an explicit handle to the ledger; nothing is global. Each method
/// is atomic: either all of its writes commit or none do. Conflicts
/// reported by the ledger are returned, never retried.
///
/// # Example
///
/// ```rust
/// use regnet_core::{InvocationContext, Operation, Registry, RegistryConfig, TxTimestamp};
/// use regnet_storage::InMemoryLedger;
/// use std::sync::Arc;
///
/// let registry = Registry::new(Arc::new(InMemoryLedger::new()), RegistryConfig::default());
/// let ctx = InvocationContext::anonymous(TxTimestamp::from_seconds(0));
///
/// let op = Operation::from_call("regnet.user:viewUser", &["Alice".to_string(), "SSN1".to_string()]).unwrap();
/// assert!(registry.invoke(&ctx, op).is_err());
/// ```
pub struct Registry<S: LedgerStore> {
    store: Arc<S>,
    config: RegistryConfig,
}

impl<S: LedgerStore> Registry<S> {
    /// Creates a registry over `store`.
    pub fn new(store: Arc<S>, config: RegistryConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying ledger.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Files a user account request.
    pub fn create_user_request(
        &self,
        ctx: &InvocationContext,
        name: &str,
        email: &str,
        phone: &str,
        ssn: &str,
    ) -> RegistryResult<UserRequest> {
        self.execute(ctx, "createUserRequest", |repo| {
            user::create_user_request(repo, ctx, name, email, phone, ssn)
        })
    }

    /// Approves a pending user request.
    pub fn approve_new_user(
        &self,
        ctx: &InvocationContext,
        name: &str,
        ssn: &str,
    ) -> RegistryResult<User> {
        self.execute(ctx, "approveNewUser", |repo| {
            registrar::approve_new_user(repo, name, ssn)
        })
    }

    /// Tops up a user balance with a recognized code.
    pub fn recharge_account(
        &self,
        ctx: &InvocationContext,
        name: &str,
        ssn: &str,
        top_up_code: &str,
    ) -> RegistryResult<Recharge> {
        let table = &self.config.top_up_table;
        self.execute(ctx, "rechargeAccount", |repo| {
            user::recharge_account(repo, table, name, ssn, top_up_code)
        })
    }

    /// Reads an active user.
    pub fn view_user(&self, ctx: &InvocationContext, name: &str, ssn: &str) -> RegistryResult<User> {
        self.execute(ctx, "viewUser", |repo| registrar::view_user(repo, name, ssn))
    }

    /// Files a property registration.
    pub fn property_registration_request(
        &self,
        ctx: &InvocationContext,
        prop_id: &str,
        price: u64,
        owner_name: &str,
        owner_ssn: &str,
    ) -> RegistryResult<PropertyRequest> {
        self.execute(ctx, "propertyRegistrationRequest", |repo| {
            user::property_registration_request(repo, prop_id, price, owner_name, owner_ssn)
        })
    }

    /// Approves a pending property registration.
    pub fn approve_property_request(
        &self,
        ctx: &InvocationContext,
        prop_id: &str,
    ) -> RegistryResult<Property> {
        self.execute(ctx, "approvePropertyRequest", |repo| {
            registrar::approve_property_request(repo, prop_id)
        })
    }

    /// Reads a registered property.
    pub fn view_property(&self, ctx: &InvocationContext, prop_id: &str) -> RegistryResult<Property> {
        self.execute(ctx, "viewProperty", |repo| {
            registrar::view_property(repo, prop_id)
        })
    }

    /// Changes a property's listing status on behalf of its owner.
    pub fn update_property(
        &self,
        ctx: &InvocationContext,
        prop_id: &str,
        status: &str,
        owner_name: &str,
        owner_ssn: &str,
    ) -> RegistryResult<Property> {
        self.execute(ctx, "updateProperty", |repo| {
            user::update_property(repo, prop_id, status, owner_name, owner_ssn)
        })
    }

    /// Buys a listed property.
    pub fn purchase_property(
        &self,
        ctx: &InvocationContext,
        prop_id: &str,
        buyer_name: &str,
        buyer_ssn: &str,
    ) -> RegistryResult<Property> {
        let config = &self.config;
        self.execute(ctx, "purchaseProperty", |repo| {
            user::purchase_property(repo, config, prop_id, buyer_name, buyer_ssn)
        })
    }

    /// Runs `op` and wraps its result.
    pub fn invoke(&self, ctx: &InvocationContext, op: Operation) -> RegistryResult<Outcome> {
        match op {
            Operation::CreateUserRequest {
                name,
                email,
                phone,
                ssn,
            } => self
                .create_user_request(ctx, &name, &email, &phone, &ssn)
                .map(Outcome::UserRequest),
            Operation::ApproveNewUser { name, ssn } => {
                self.approve_new_user(ctx, &name, &ssn).map(Outcome::User)
            }
            Operation::RechargeAccount {
                name,
                ssn,
                top_up_code,
            } => self
                .recharge_account(ctx, &name, &ssn, &top_up_code)
                .map(Outcome::Recharge),
            Operation::ViewUser { name, ssn } => self.view_user(ctx, &name, &ssn).map(Outcome::User),
            Operation::PropertyRegistrationRequest {
                prop_id,
                price,
                owner_name,
                owner_ssn,
            } => self
                .property_registration_request(ctx, &prop_id, price, &owner_name, &owner_ssn)
                .map(Outcome::PropertyRequest),
            Operation::ApprovePropertyRequest { prop_id } => self
                .approve_property_request(ctx, &prop_id)
                .map(Outcome::Property),
            Operation::ViewProperty { prop_id } => {
                self.view_property(ctx, &prop_id).map(Outcome::Property)
            }
            Operation::UpdateProperty {
                prop_id,
                status,
                owner_name,
                owner_ssn,
            } => self
                .update_property(ctx, &prop_id, &status, &owner_name, &owner_ssn)
                .map(Outcome::Property),
            Operation::PurchaseProperty {
                prop_id,
                buyer_name,
                buyer_ssn,
            } => self
                .purchase_property(ctx, &prop_id, &buyer_name, &buyer_ssn)
                .map(Outcome::Property),
        }
    }

    fn execute<R>(
        &self,
        ctx: &InvocationContext,
        op: &'static str,
        f: impl FnOnce(&mut Repository<'_, '_>) -> RegistryResult<R>,
    ) -> RegistryResult<R> {
        let span = info_span!("invocation", op, tx_id = %ctx.tx_id, caller = %ctx.caller);
        let _enter = span.enter();

        let mut invocation = Invocation::begin(&*self.store);
        let result = f(&mut Repository::new(&mut invocation));
        match result {
            Ok(value) => {
                let height = invocation.commit()?;
                debug!(%height, "committed");
                Ok(value)
            }
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "aborted");
                invocation.abort();
                Err(err)
            }
        }
    }
}

impl<S: LedgerStore> std::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
