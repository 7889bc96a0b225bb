//! Status service - ledger-wide summary

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Result;
use crate::domain::AccountType;

/// Status service for ledger summaries
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let counts = self.repository.get_counts()?;
        let accounts = self.repository.list_accounts()?;
        let latest_transaction = self
            .repository
            .list_transactions()?
            .last()
            .map(|t| t.timestamp.to_rfc3339());

        let mut by_type = Vec::new();
        for account_type in [AccountType::Checking, AccountType::Savings] {
            let of_type: Vec<_> = accounts
                .iter()
                .filter(|a| a.account_type == account_type)
                .collect();
            by_type.push(AccountTypeSummary {
                account_type,
                accounts: of_type.len() as i64,
                balance: of_type.iter().map(|a| a.balance).sum(),
            });
        }

        Ok(StatusSummary {
            total_customers: counts.customers,
            total_accounts: counts.accounts,
            total_transactions: counts.transactions,
            total_users: counts.users,
            total_balance: counts.total_balance,
            by_type,
            latest_transaction,
            database: self
                .repository
                .db_path()
                .map(|p| p.display().to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_customers: i64,
    pub total_accounts: i64,
    pub total_transactions: i64,
    pub total_users: i64,
    pub total_balance: Decimal,
    pub by_type: Vec<AccountTypeSummary>,
    pub latest_transaction: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountTypeSummary {
    pub account_type: AccountType,
    pub accounts: i64,
    pub balance: Decimal,
}
