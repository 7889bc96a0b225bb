//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// Kind of balance-affecting event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            "TRANSFER" => Ok(TransactionType::Transfer),
            other => Err(Error::validation(format!(
                "Invalid transaction type '{}'. Valid types are: DEPOSIT, WITHDRAWAL, TRANSFER",
                other
            ))),
        }
    }
}

/// A ledger record that has not been appended yet
///
/// `from_account_id` is the account the event applies to: the credited
/// account for deposits, the debited one for withdrawals and transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub from_account_id: Uuid,
    pub to_account_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
}

impl NewTransaction {
    pub fn deposit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            from_account_id: account_id,
            to_account_id: None,
            transaction_type: TransactionType::Deposit,
            amount,
        }
    }

    pub fn withdrawal(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            from_account_id: account_id,
            to_account_id: None,
            transaction_type: TransactionType::Withdrawal,
            amount,
        }
    }

    pub fn transfer(from: Uuid, to: Uuid, amount: Decimal) -> Self {
        Self {
            from_account_id: from,
            to_account_id: Some(to),
            transaction_type: TransactionType::Transfer,
            amount,
        }
    }

    /// Check the record's shape: positive amount, counterparty iff transfer
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::validation("Amount must be greater than 0"));
        }
        match (self.transaction_type, self.to_account_id) {
            (TransactionType::Transfer, None) => Err(Error::validation(
                "To account ID is required for transfers",
            )),
            (TransactionType::Transfer, Some(to)) if to == self.from_account_id => Err(
                Error::validation("Sender and receiver accounts must differ"),
            ),
            (TransactionType::Deposit | TransactionType::Withdrawal, Some(_)) => Err(
                Error::validation("To account ID is only accepted for transfers"),
            ),
            _ => Ok(()),
        }
    }
}

/// An appended, immutable ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Stamp a validated record with its identity
    pub fn from_new(record: NewTransaction) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_account_id: record.from_account_id,
            to_account_id: record.to_account_id,
            transaction_type: record.transaction_type,
            amount: record.amount,
            timestamp: Utc::now(),
        }
    }

    /// True if the record touches `account_id` on either side
    pub fn involves(&self, account_id: Uuid) -> bool {
        self.from_account_id == account_id || self.to_account_id == Some(account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("DEPOSIT".parse::<TransactionType>().unwrap(), TransactionType::Deposit);
        assert_eq!("TRANSFER".parse::<TransactionType>().unwrap(), TransactionType::Transfer);
        let err = "REFUND".parse::<TransactionType>().unwrap_err();
        assert!(err.to_string().contains("REFUND"));
    }

    #[test]
    fn test_transfer_requires_distinct_accounts() {
        let a = Uuid::new_v4();
        let record = NewTransaction::transfer(a, a, Decimal::new(1000, 2));
        assert!(record.validate().is_err());

        let record = NewTransaction::transfer(a, Uuid::new_v4(), Decimal::new(1000, 2));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_transfer_requires_counterparty() {
        let mut record = NewTransaction::transfer(Uuid::new_v4(), Uuid::new_v4(), Decimal::ONE);
        record.to_account_id = None;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_single_leg_rejects_counterparty() {
        let mut record = NewTransaction::deposit(Uuid::new_v4(), Decimal::ONE);
        assert!(record.validate().is_ok());
        record.to_account_id = Some(Uuid::new_v4());
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_amount_must_be_positive() {
        let record = NewTransaction::withdrawal(Uuid::new_v4(), Decimal::ZERO);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_involves() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let tx = Transaction::from_new(NewTransaction::transfer(from, to, Decimal::ONE));
        assert!(tx.involves(from));
        assert!(tx.involves(to));
        assert!(!tx.involves(Uuid::new_v4()));
    }
}
