//! Account service - administrative account lifecycle and history
//!
//! Opening an account never touches a balance; balances move only through
//! the ledger, which also owns deletion.

use std::sync::Arc;

use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountType, BalanceAdjustment, Transaction};
use crate::ports::AccountStore;

pub struct AccountService {
    repository: Arc<DuckDbRepository>,
}

impl AccountService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Open a zero-balance account for an existing customer
    pub fn open_account(
        &self,
        customer_id: Uuid,
        account_type: AccountType,
        branch_id: Uuid,
    ) -> Result<Account> {
        if self.repository.get_customer(customer_id)?.is_none() {
            return Err(Error::not_found("No customer exists with this customer_id"));
        }
        let account = Account::open(customer_id, account_type, branch_id);
        self.repository.insert_account(&account)?;
        tracing::info!(account = %account.id, customer = %customer_id, "account opened");
        Ok(account)
    }

    pub fn get_account(&self, id: Uuid) -> Result<Account> {
        self.repository.get_account(id)
    }

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list_accounts()
    }

    /// Transactions on either side of the account, oldest first
    pub fn history(&self, id: Uuid) -> Result<Vec<Transaction>> {
        self.repository.get_account(id)?;
        self.repository.transactions_for_account(id)
    }

    pub fn adjustments(&self, id: Uuid) -> Result<Vec<BalanceAdjustment>> {
        self.repository.get_account(id)?;
        self.repository.adjustments_for_account(id)
    }

    pub fn get_transaction(&self, id: Uuid) -> Result<Transaction> {
        self.repository
            .get_transaction(id)?
            .ok_or_else(|| Error::not_found("Transaction not found"))
    }

    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.repository.list_transactions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, NewTransaction};
    use crate::ports::TransactionLog;
    use rust_decimal::Decimal;

    fn setup() -> (Arc<DuckDbRepository>, AccountService, Customer) {
        let repo = Arc::new(DuckDbRepository::open_in_memory().unwrap());
        repo.ensure_schema().unwrap();
        let customer = Customer::new("Ada", "Lovelace", "ada@example.com");
        repo.insert_customer(&customer).unwrap();
        (Arc::clone(&repo), AccountService::new(repo), customer)
    }

    #[test]
    fn test_open_account_starts_at_zero() {
        let (_, service, customer) = setup();
        let account = service
            .open_account(customer.id, AccountType::Checking, Uuid::new_v4())
            .unwrap();

        assert_eq!(service.get_account(account.id).unwrap().balance, Decimal::ZERO);
        assert_eq!(service.list_accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_open_account_for_unknown_customer() {
        let (_, service, _) = setup();
        assert!(matches!(
            service.open_account(Uuid::new_v4(), AccountType::Savings, Uuid::new_v4()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_history_of_missing_account() {
        let (_, service, _) = setup();
        assert!(matches!(service.history(Uuid::new_v4()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_history_and_transaction_lookup() {
        let (repo, service, customer) = setup();
        let account = service
            .open_account(customer.id, AccountType::Checking, Uuid::new_v4())
            .unwrap();
        let tx = repo.append(NewTransaction::deposit(account.id, Decimal::ONE)).unwrap();

        assert_eq!(service.history(account.id).unwrap().len(), 1);
        assert_eq!(service.get_transaction(tx.id).unwrap().amount, Decimal::ONE);
        assert!(matches!(
            service.get_transaction(Uuid::new_v4()),
            Err(Error::NotFound(_))
        ));
    }
}
