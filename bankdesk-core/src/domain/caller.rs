//! Caller capability - who is asking, and which accounts they may debit

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use super::result::{Error, Result};
use super::user::Role;

/// Resolved identity of an authenticated caller
///
/// Built once per request from the user store; the ledger consults it
/// instead of re-reading ownership itself.
#[derive(Debug, Clone, Serialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
    pub customer_id: Option<Uuid>,
    pub owned_accounts: HashSet<Uuid>,
}

impl Caller {
    /// An administrator; bypasses ownership checks
    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            customer_id: None,
            owned_accounts: HashSet::new(),
        }
    }

    /// A self-service caller bound to `customer_id`
    pub fn customer(
        user_id: Uuid,
        customer_id: Uuid,
        owned_accounts: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        Self {
            user_id,
            role: Role::User,
            customer_id: Some(customer_id),
            owned_accounts: owned_accounts.into_iter().collect(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admin-only operations
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("Admins only! Access forbidden."))
        }
    }

    /// Check that this caller may move money out of `account_id`
    pub fn authorize_debit(&self, account_id: Uuid) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }
        if self.customer_id.is_none() {
            return Err(Error::not_found("No customer is bound to this user"));
        }
        if !self.owned_accounts.contains(&account_id) {
            return Err(Error::forbidden(
                "This account is not connected with the authenticated customer",
            ));
        }
        Ok(())
    }
}
