//! Account domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// Kind of deposit account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
            AccountType::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CHECKING" => Ok(AccountType::Checking),
            "SAVINGS" => Ok(AccountType::Savings),
            other => Err(Error::validation(format!(
                "Invalid account type '{}'. Valid types are: CHECKING, SAVINGS",
                other
            ))),
        }
    }
}

/// A customer's account held at a branch
///
/// The balance is only ever changed through the ledger; everything else is
/// fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub branch_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Open a new account with a zero balance
    pub fn open(customer_id: Uuid, account_type: AccountType, branch_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            account_type,
            balance: Decimal::ZERO,
            branch_id,
            created_at: Utc::now(),
        }
    }

    /// Balance after applying `delta`, or `None` if it would go negative
    pub fn balance_after(&self, delta: Decimal) -> Option<Decimal> {
        self.balance
            .checked_add(delta)
            .filter(|next| *next >= Decimal::ZERO)
    }
}
