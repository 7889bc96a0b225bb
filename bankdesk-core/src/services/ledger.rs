//! Ledger service - the only path by which balances change
//!
//! Every balance mutation is paired with exactly one log record (or one
//! audit entry for administrative adjustments). Each operation runs inside
//! the per-account scopes of the accounts it touches.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::amount::{nonzero_delta, positive_amount};
use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, BalanceAdjustment, Caller, NewTransaction, Transaction, TransactionType,
    TransferAttempt, TransferReceipt, TransferState,
};
use crate::ports::{AccountStore, TransactionLog};
use crate::services::locks::AccountLocks;
use crate::services::logging::{LogEvent, LoggingService};

/// Ledger engine over an account store and a transaction log
pub struct LedgerService<S, L> {
    store: Arc<S>,
    log: Arc<L>,
    locks: AccountLocks,
    event_log: Option<Arc<LoggingService>>,
}

impl<S: AccountStore, L: TransactionLog> LedgerService<S, L> {
    pub fn new(store: Arc<S>, log: Arc<L>) -> Self {
        Self {
            store,
            log,
            locks: AccountLocks::new(),
            event_log: None,
        }
    }

    /// Also record partial failures in the operational event log
    pub fn with_event_log(mut self, logger: Arc<LoggingService>) -> Self {
        self.event_log = Some(logger);
        self
    }

    pub fn get_account(&self, id: Uuid) -> Result<Account> {
        self.store.get_account(id)
    }

    /// Credit `amount` to an account and log a DEPOSIT
    pub fn deposit(&self, account_id: Uuid, amount: Decimal) -> Result<Transaction> {
        let amount = positive_amount(amount)?;
        self.locks.with_accounts(&[account_id], || {
            let balance = self.store.adjust_balance(account_id, amount)?;
            let tx = self.append_after_mutation(
                "deposit",
                NewTransaction::deposit(account_id, amount),
            )?;
            tracing::info!(account = %account_id, %amount, %balance, "deposit");
            Ok(tx)
        })
    }

    /// Debit `amount` from an account and log a WITHDRAWAL
    ///
    /// `Error::InsufficientFunds` leaves the balance untouched and writes no
    /// record.
    pub fn withdraw(&self, account_id: Uuid, amount: Decimal) -> Result<Transaction> {
        let amount = positive_amount(amount)?;
        self.locks.with_accounts(&[account_id], || {
            let balance = self.store.adjust_balance(account_id, -amount)?;
            let tx = self.append_after_mutation(
                "withdraw",
                NewTransaction::withdrawal(account_id, amount),
            )?;
            tracing::info!(account = %account_id, %amount, %balance, "withdrawal");
            Ok(tx)
        })
    }

    /// Move `amount` from `from` to `to` on behalf of `caller`
    ///
    /// The debit is applied first. A failed credit is compensated by
    /// restoring the debit, and a failed append by reversing both legs; if
    /// compensation fails too the error is `Error::PartialFailure`.
    pub fn transfer(
        &self,
        from: Uuid,
        to: Uuid,
        amount: Decimal,
        caller: &Caller,
    ) -> Result<TransferReceipt> {
        if from == to {
            return Err(Error::validation("Sender and receiver accounts must differ"));
        }
        let amount = positive_amount(amount)?;

        let mut attempt = TransferAttempt::new();
        caller.authorize_debit(from)?;
        attempt.advance(TransferState::Authorized)?;

        self.store.get_account(from)?;
        self.store.get_account(to)?;

        self.locks.with_accounts(&[from, to], || {
            self.store.adjust_balance(from, -amount)?;
            attempt.advance(TransferState::Debited)?;

            if let Err(cause) = self.store.adjust_balance(to, amount) {
                return Err(self.restore_debit(&mut attempt, from, to, amount, cause));
            }
            attempt.advance(TransferState::Credited)?;

            match self.log.append(NewTransaction::transfer(from, to, amount)) {
                Ok(transaction) => {
                    attempt.advance(TransferState::Logged)?;
                    tracing::info!(%from, %to, %amount, id = %transaction.id, "transfer");
                    Ok(TransferReceipt {
                        transaction,
                        states: attempt.history().to_vec(),
                    })
                }
                Err(cause) => Err(self.reverse_both_legs(&mut attempt, from, to, amount, cause)),
            }
        })
    }

    /// Administrative correction by a signed `delta`
    pub fn adjust_balance(
        &self,
        account_id: Uuid,
        delta: Decimal,
        caller: &Caller,
        reason: Option<String>,
    ) -> Result<BalanceAdjustment> {
        caller.require_admin()?;
        let delta = nonzero_delta(delta)?;

        self.locks.with_accounts(&[account_id], || {
            let new_balance = self.store.adjust_balance(account_id, delta)?;
            let entry = BalanceAdjustment::new(
                account_id,
                delta,
                new_balance,
                Some(caller.user_id),
                reason,
            );
            if let Err(e) = self.log.record_adjustment(&entry) {
                return Err(self.partial_failure(
                    "adjust",
                    format!(
                        "balance of {} changed by {} but the audit entry was not written: {}",
                        account_id, delta, e
                    ),
                ));
            }
            tracing::info!(account = %account_id, %delta, %new_balance, actor = %caller.user_id, "balance adjusted");
            Ok(entry)
        })
    }

    /// Delete an account that no ledger record references
    ///
    /// Runs inside the account's scope, so it cannot interleave with a
    /// mutation whose record has not been written yet.
    pub fn delete_account(&self, account_id: Uuid, caller: &Caller) -> Result<()> {
        caller.require_admin()?;
        self.locks.with_accounts(&[account_id], || {
            self.store.remove_account(account_id)?;
            tracing::info!(account = %account_id, "account deleted");
            Ok(())
        })
    }

    /// Apply an administrator-submitted transaction record
    ///
    /// Dispatches to the matching ledger operation so the record and its
    /// balance change stay paired.
    pub fn record(&self, record: NewTransaction, caller: &Caller) -> Result<Transaction> {
        caller.require_admin()?;
        record.validate()?;
        match (record.transaction_type, record.to_account_id) {
            (TransactionType::Deposit, _) => self.deposit(record.from_account_id, record.amount),
            (TransactionType::Withdrawal, _) => {
                self.withdraw(record.from_account_id, record.amount)
            }
            (TransactionType::Transfer, Some(to)) => self
                .transfer(record.from_account_id, to, record.amount, caller)
                .map(|receipt| receipt.transaction),
            (TransactionType::Transfer, None) => Err(Error::validation(
                "To account ID is required for transfers",
            )),
        }
    }

    fn append_after_mutation(&self, operation: &str, record: NewTransaction) -> Result<Transaction> {
        let account_id = record.from_account_id;
        let amount = record.amount;
        self.log.append(record).map_err(|e| {
            self.partial_failure(
                operation,
                format!(
                    "balance of {} changed by {} but the {} record was not written: {}",
                    account_id, amount, operation, e
                ),
            )
        })
    }

    fn restore_debit(
        &self,
        attempt: &mut TransferAttempt,
        from: Uuid,
        to: Uuid,
        amount: Decimal,
        cause: Error,
    ) -> Error {
        tracing::warn!(%from, %to, %amount, error = %cause, "credit leg failed, restoring debit");
        match self.store.adjust_balance(from, amount) {
            Ok(_) => self.rolled_back(attempt, cause),
            Err(e) => self.partial_failure(
                "transfer",
                format!(
                    "credit of {} to {} failed ({}); restoring the debit on {} failed: {}",
                    amount, to, cause, from, e
                ),
            ),
        }
    }

    fn reverse_both_legs(
        &self,
        attempt: &mut TransferAttempt,
        from: Uuid,
        to: Uuid,
        amount: Decimal,
        cause: Error,
    ) -> Error {
        tracing::warn!(%from, %to, %amount, error = %cause, "transfer record not written, reversing both legs");
        if let Err(e) = self.store.adjust_balance(to, -amount) {
            return self.partial_failure(
                "transfer",
                format!(
                    "transfer of {} from {} to {} applied without a record ({}); reversing the credit failed: {}",
                    amount, from, to, cause, e
                ),
            );
        }
        match self.store.adjust_balance(from, amount) {
            Ok(_) => self.rolled_back(attempt, cause),
            Err(e) => self.partial_failure(
                "transfer",
                format!(
                    "transfer of {} from {} to {} reversed on {} only ({}); restoring the debit failed: {}",
                    amount, from, to, to, cause, e
                ),
            ),
        }
    }

    fn rolled_back(&self, attempt: &mut TransferAttempt, cause: Error) -> Error {
        match attempt.advance(TransferState::RolledBack) {
            Ok(()) => {
                tracing::info!(states = ?attempt.history(), "transfer rolled back");
                cause
            }
            Err(e) => e,
        }
    }

    fn partial_failure(&self, operation: &str, detail: String) -> Error {
        tracing::error!(operation, detail = %detail, "ledger partial failure, reconciliation required");
        if let Some(logger) = &self.event_log {
            let event = LogEvent::new("ledger_partial_failure")
                .with_operation(operation)
                .with_error("reconciliation required")
                .with_error_details(detail.as_str());
            if let Err(e) = logger.log(event) {
                tracing::warn!(error = %e, "could not record partial failure event");
            }
        }
        Error::partial_failure(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::domain::{AccountType, Customer};
    use crate::services::logging::EntryPoint;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Barrier, Mutex};
    use std::thread;
    use std::time::Duration;

    /// Account store that can refuse credits to chosen accounts
    struct FlakyStore {
        inner: Arc<DuckDbRepository>,
        refuse_credits: Mutex<HashSet<Uuid>>,
        /// Pauses the next credit to this account on a two-party barrier
        credit_gate: Mutex<Option<(Uuid, Arc<Barrier>)>>,
        calls: AtomicUsize,
    }

    impl FlakyStore {
        fn new(inner: Arc<DuckDbRepository>) -> Self {
            Self {
                inner,
                refuse_credits: Mutex::new(HashSet::new()),
                credit_gate: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        fn pause_next_credit_to(&self, id: Uuid) -> Arc<Barrier> {
            let gate = Arc::new(Barrier::new(2));
            *self.credit_gate.lock().unwrap() = Some((id, Arc::clone(&gate)));
            gate
        }

        fn refuse_credits_to(&self, id: Uuid) {
            self.refuse_credits.lock().unwrap().insert(id);
        }
    }

    impl AccountStore for FlakyStore {
        fn get_account(&self, id: Uuid) -> Result<Account> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_account(id)
        }

        fn adjust_balance(&self, id: Uuid, delta: Decimal) -> Result<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if delta > Decimal::ZERO && self.refuse_credits.lock().unwrap().contains(&id) {
                return Err(Error::database("injected credit failure"));
            }
            let gate = {
                let mut slot = self.credit_gate.lock().unwrap();
                match slot.take() {
                    Some((gated, gate)) if gated == id && delta > Decimal::ZERO => Some(gate),
                    other => {
                        *slot = other;
                        None
                    }
                }
            };
            let result = self.inner.adjust_balance(id, delta);
            if let Some(gate) = gate {
                // credited; hold here until the test releases us
                gate.wait();
                gate.wait();
            }
            result
        }

        fn remove_account(&self, id: Uuid) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.remove_account(id)
        }
    }

    /// Transaction log that can be switched off
    struct FlakyLog {
        inner: Arc<DuckDbRepository>,
        down: AtomicBool,
    }

    impl TransactionLog for FlakyLog {
        fn append(&self, record: NewTransaction) -> Result<Transaction> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::database("injected log failure"));
            }
            self.inner.append(record)
        }

        fn record_adjustment(&self, entry: &BalanceAdjustment) -> Result<()> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::database("injected log failure"));
            }
            self.inner.record_adjustment(entry)
        }
    }

    struct Fixture {
        repo: Arc<DuckDbRepository>,
        store: Arc<FlakyStore>,
        log: Arc<FlakyLog>,
        events: Arc<LoggingService>,
        ledger: LedgerService<FlakyStore, FlakyLog>,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(DuckDbRepository::open_in_memory().unwrap());
        repo.ensure_schema().unwrap();
        let store = Arc::new(FlakyStore::new(Arc::clone(&repo)));
        let log = Arc::new(FlakyLog {
            inner: Arc::clone(&repo),
            down: AtomicBool::new(false),
        });
        let events = Arc::new(LoggingService::in_memory(EntryPoint::Api, "test").unwrap());
        let ledger = LedgerService::new(Arc::clone(&store), Arc::clone(&log))
            .with_event_log(Arc::clone(&events));
        Fixture {
            repo,
            store,
            log,
            events,
            ledger,
        }
    }

    fn open_account(repo: &DuckDbRepository, customer_id: Uuid, balance: Decimal) -> Uuid {
        let mut account = Account::open(customer_id, AccountType::Checking, Uuid::new_v4());
        account.balance = balance;
        repo.insert_account(&account).unwrap();
        account.id
    }

    fn customer(repo: &DuckDbRepository) -> Uuid {
        let c = Customer::new("Ada", "Lovelace", "ada@example.com");
        repo.insert_customer(&c).unwrap();
        c.id
    }

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn balance(f: &Fixture, id: Uuid) -> Decimal {
        f.repo.get_account(id).unwrap().balance
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let f = fixture();
        let c = customer(&f.repo);
        let id = open_account(&f.repo, c, Decimal::ZERO);

        let tx = f.ledger.deposit(id, dec(2500)).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Deposit);
        f.ledger.withdraw(id, dec(1000)).unwrap();

        assert_eq!(balance(&f, id), dec(1500));
        assert_eq!(f.repo.transactions_for_account(id).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let f = fixture();
        let c = customer(&f.repo);
        let id = open_account(&f.repo, c, dec(1000));

        assert!(matches!(f.ledger.deposit(id, Decimal::ZERO), Err(Error::Validation(_))));
        assert!(matches!(f.ledger.withdraw(id, dec(-100)), Err(Error::Validation(_))));
        assert_eq!(balance(&f, id), dec(1000));
    }

    #[test]
    fn test_transfer_records_every_state() {
        let f = fixture();
        let c = customer(&f.repo);
        let from = open_account(&f.repo, c, dec(10000));
        let to = open_account(&f.repo, c, Decimal::ZERO);

        let receipt = f
            .ledger
            .transfer(from, to, dec(4000), &Caller::customer(Uuid::new_v4(), c, [from, to]))
            .unwrap();

        assert_eq!(
            receipt.states,
            vec![
                TransferState::Initiated,
                TransferState::Authorized,
                TransferState::Debited,
                TransferState::Credited,
                TransferState::Logged,
            ]
        );
        assert_eq!(receipt.transaction.to_account_id, Some(to));
        assert_eq!(balance(&f, from), dec(6000));
        assert_eq!(balance(&f, to), dec(4000));
    }

    #[test]
    fn test_self_transfer_never_touches_storage() {
        let f = fixture();
        let id = Uuid::new_v4();

        let err = f
            .ledger
            .transfer(id, id, dec(100), &Caller::admin(Uuid::new_v4()))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(f.store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_credit_failure_restores_source() {
        let f = fixture();
        let c = customer(&f.repo);
        let from = open_account(&f.repo, c, dec(10000));
        let to = open_account(&f.repo, c, Decimal::ZERO);
        f.store.refuse_credits_to(to);

        let err = f
            .ledger
            .transfer(from, to, dec(4000), &Caller::admin(Uuid::new_v4()))
            .unwrap_err();

        assert!(matches!(err, Error::Database(_)));
        assert_eq!(balance(&f, from), dec(10000));
        assert_eq!(balance(&f, to), Decimal::ZERO);
        assert!(f.repo.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_failed_compensation_is_partial_failure() {
        let f = fixture();
        let c = customer(&f.repo);
        let from = open_account(&f.repo, c, dec(10000));
        let to = open_account(&f.repo, c, Decimal::ZERO);
        f.store.refuse_credits_to(to);
        f.store.refuse_credits_to(from);

        let err = f
            .ledger
            .transfer(from, to, dec(4000), &Caller::admin(Uuid::new_v4()))
            .unwrap_err();

        assert!(err.needs_reconciliation());
        assert_eq!(balance(&f, from), dec(6000));
        assert_eq!(f.events.get_by_event("ledger_partial_failure", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_unlogged_transfer_is_reversed() {
        let f = fixture();
        let c = customer(&f.repo);
        let from = open_account(&f.repo, c, dec(10000));
        let to = open_account(&f.repo, c, dec(500));
        f.log.down.store(true, Ordering::SeqCst);

        let err = f
            .ledger
            .transfer(from, to, dec(4000), &Caller::admin(Uuid::new_v4()))
            .unwrap_err();

        assert!(!err.needs_reconciliation());
        assert_eq!(balance(&f, from), dec(10000));
        assert_eq!(balance(&f, to), dec(500));
    }

    #[test]
    fn test_unlogged_deposit_is_partial_failure() {
        let f = fixture();
        let c = customer(&f.repo);
        let id = open_account(&f.repo, c, Decimal::ZERO);
        f.log.down.store(true, Ordering::SeqCst);

        let err = f.ledger.deposit(id, dec(700)).unwrap_err();

        assert!(matches!(err, Error::PartialFailure(_)));
        // the balance change stands
        assert_eq!(balance(&f, id), dec(700));
        let events = f.events.get_by_event("ledger_partial_failure", 10).unwrap();
        assert_eq!(events[0].operation.as_deref(), Some("deposit"));
    }

    #[test]
    fn test_adjust_balance_requires_admin() {
        let f = fixture();
        let c = customer(&f.repo);
        let id = open_account(&f.repo, c, dec(1000));
        let user = Caller::customer(Uuid::new_v4(), c, [id]);

        assert!(matches!(
            f.ledger.adjust_balance(id, dec(500), &user, None),
            Err(Error::Forbidden(_))
        ));
        assert_eq!(balance(&f, id), dec(1000));
    }

    #[test]
    fn test_adjust_balance_writes_audit_entry() {
        let f = fixture();
        let c = customer(&f.repo);
        let id = open_account(&f.repo, c, dec(1000));
        let admin = Caller::admin(Uuid::new_v4());

        let entry = f
            .ledger
            .adjust_balance(id, dec(-250), &admin, Some("fee reversal".into()))
            .unwrap();
        assert_eq!(entry.new_balance, dec(750));
        assert_eq!(entry.actor, Some(admin.user_id));

        assert!(matches!(
            f.ledger.adjust_balance(id, dec(-1000), &admin, None),
            Err(Error::InsufficientFunds { .. })
        ));
        assert_eq!(f.repo.adjustments_for_account(id).unwrap().len(), 1);
    }

    #[test]
    fn test_record_dispatches_by_type() {
        let f = fixture();
        let c = customer(&f.repo);
        let a = open_account(&f.repo, c, Decimal::ZERO);
        let b = open_account(&f.repo, c, Decimal::ZERO);
        let admin = Caller::admin(Uuid::new_v4());

        f.ledger.record(NewTransaction::deposit(a, dec(900)), &admin).unwrap();
        f.ledger.record(NewTransaction::transfer(a, b, dec(300)), &admin).unwrap();
        f.ledger.record(NewTransaction::withdrawal(b, dec(100)), &admin).unwrap();

        assert_eq!(balance(&f, a), dec(600));
        assert_eq!(balance(&f, b), dec(200));
        assert_eq!(f.repo.list_transactions().unwrap().len(), 3);

        let user = Caller::customer(Uuid::new_v4(), c, [a]);
        assert!(matches!(
            f.ledger.record(NewTransaction::deposit(a, dec(1)), &user),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn test_delete_account_waits_for_in_flight_transfer() {
        let f = fixture();
        let c = customer(&f.repo);
        let from = open_account(&f.repo, c, dec(10000));
        let to = open_account(&f.repo, c, Decimal::ZERO);
        let admin = Caller::admin(Uuid::new_v4());
        let gate = f.store.pause_next_credit_to(to);

        thread::scope(|scope| {
            let transfer = scope.spawn(|| f.ledger.transfer(from, to, dec(4000), &admin));
            // the credit has landed and the transfer still holds both scopes
            gate.wait();
            let delete = scope.spawn(|| f.ledger.delete_account(to, &admin));
            thread::sleep(Duration::from_millis(100));
            assert!(!delete.is_finished());
            gate.wait();

            assert!(transfer.join().unwrap().is_ok());
            assert!(matches!(delete.join().unwrap(), Err(Error::Conflict(_))));
        });

        assert_eq!(balance(&f, to), dec(4000));
        assert_eq!(f.repo.transactions_for_account(to).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_account() {
        let f = fixture();
        let c = customer(&f.repo);
        let unused = open_account(&f.repo, c, Decimal::ZERO);
        let user = Caller::customer(Uuid::new_v4(), c, [unused]);

        assert!(matches!(f.ledger.delete_account(unused, &user), Err(Error::Forbidden(_))));
        f.ledger
            .delete_account(unused, &Caller::admin(Uuid::new_v4()))
            .unwrap();
        assert!(matches!(f.ledger.get_account(unused), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_out_of_range_amounts_are_rejected_before_mutation() {
        let f = fixture();
        let c = customer(&f.repo);
        let id = open_account(&f.repo, c, dec(100));
        let other = open_account(&f.repo, c, Decimal::ZERO);
        let admin = Caller::admin(Uuid::new_v4());

        assert!(matches!(f.ledger.deposit(id, Decimal::MAX), Err(Error::Validation(_))));
        assert!(matches!(
            f.ledger.deposit(id, Decimal::new(100_000_000_000_000_000, 0)),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            f.ledger.adjust_balance(id, Decimal::MIN, &admin, None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            f.ledger.transfer(id, other, Decimal::MAX, &admin),
            Err(Error::Validation(_))
        ));

        assert_eq!(balance(&f, id), dec(100));
        assert!(f.repo.transactions_for_account(id).unwrap().is_empty());
        // store is still usable
        f.ledger.deposit(id, dec(100)).unwrap();
        assert_eq!(balance(&f, id), dec(200));
    }

    #[test]
    fn test_credit_past_storage_range_rolls_transfer_back() {
        let f = fixture();
        let c = customer(&f.repo);
        let from = open_account(&f.repo, c, dec(1000));
        let full = Decimal::new(999_999_999_999_999_999, 2);
        let to = open_account(&f.repo, c, full);
        let admin = Caller::admin(Uuid::new_v4());

        let err = f.ledger.transfer(from, to, dec(500), &admin).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(balance(&f, from), dec(1000));
        assert_eq!(balance(&f, to), full);
    }
}
