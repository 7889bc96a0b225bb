//! Concurrent ledger access tests
//!
//! Many threads hit the same accounts at once through one ledger. Balances
//! must stay non-negative, every success must have exactly one record and
//! opposite-direction transfers must not deadlock.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use uuid::Uuid;

use rust_decimal::Decimal;

use bankdesk_core::adapters::duckdb::DuckDbRepository;
use bankdesk_core::domain::{Account, AccountType, Caller, Customer};
use bankdesk_core::services::LedgerService;
use bankdesk_core::Error;

type TestLedger = LedgerService<DuckDbRepository, DuckDbRepository>;

fn create_ledger(temp_dir: &TempDir) -> (Arc<DuckDbRepository>, Arc<TestLedger>) {
    let repo = Arc::new(DuckDbRepository::new(&temp_dir.path().join("test.duckdb")).unwrap());
    repo.ensure_schema().unwrap();
    let ledger = Arc::new(LedgerService::new(Arc::clone(&repo), Arc::clone(&repo)));
    (repo, ledger)
}

fn create_account(repo: &DuckDbRepository, customer: &Customer, balance: Decimal) -> Account {
    let mut account = Account::open(customer.id, AccountType::Checking, Uuid::new_v4());
    account.balance = balance;
    repo.insert_account(&account).unwrap();
    account
}

/// 20 concurrent withdrawals of 10.00 from 100.00: exactly 10 succeed
#[test]
fn test_concurrent_withdrawals_exhaust_balance_exactly() {
    const THREADS: usize = 20;

    let temp_dir = TempDir::new().unwrap();
    let (repo, ledger) = create_ledger(&temp_dir);
    let customer = Customer::new("Pat", "Tester", "pat@example.com");
    repo.insert_customer(&customer).unwrap();
    let account = create_account(&repo, &customer, Decimal::new(10000, 2));

    let barrier = Arc::new(Barrier::new(THREADS));
    let successes = Arc::new(AtomicUsize::new(0));
    let insufficient = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let ledger = Arc::clone(&ledger);
            let successes = Arc::clone(&successes);
            let insufficient = Arc::clone(&insufficient);
            thread::spawn(move || {
                barrier.wait();
                match ledger.withdraw(account.id, Decimal::new(1000, 2)) {
                    Ok(_) => {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(Error::InsufficientFunds { .. }) => {
                        insufficient.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => panic!("unexpected error: {}", e),
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(successes.load(Ordering::SeqCst), 10);
    assert_eq!(insufficient.load(Ordering::SeqCst), 10);
    assert_eq!(ledger.get_account(account.id).unwrap().balance, Decimal::ZERO);
    assert_eq!(repo.transactions_for_account(account.id).unwrap().len(), 10);
}

/// Transfers in both directions between the same pair finish and conserve the sum
#[test]
fn test_opposite_transfers_do_not_deadlock() {
    const THREADS: usize = 8;
    const ITERATIONS: usize = 10;

    let temp_dir = TempDir::new().unwrap();
    let (repo, ledger) = create_ledger(&temp_dir);
    let customer = Customer::new("Lee", "Tester", "lee@example.com");
    repo.insert_customer(&customer).unwrap();
    let a = create_account(&repo, &customer, Decimal::new(5000, 2));
    let b = create_account(&repo, &customer, Decimal::new(5000, 2));
    let caller = Arc::new(Caller::customer(Uuid::new_v4(), customer.id, [a.id, b.id]));

    let barrier = Arc::new(Barrier::new(THREADS));
    let start = Instant::now();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let ledger = Arc::clone(&ledger);
            let caller = Arc::clone(&caller);
            let (from, to) = if i % 2 == 0 { (a.id, b.id) } else { (b.id, a.id) };
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS {
                    match ledger.transfer(from, to, Decimal::new(700, 2), &caller) {
                        Ok(_) | Err(Error::InsufficientFunds { .. }) => {}
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(start.elapsed() < Duration::from_secs(60));

    let balance_a = ledger.get_account(a.id).unwrap().balance;
    let balance_b = ledger.get_account(b.id).unwrap().balance;
    assert!(balance_a >= Decimal::ZERO && balance_b >= Decimal::ZERO);
    assert_eq!(balance_a + balance_b, Decimal::new(10000, 2));

    // every recorded transfer moved exactly 7.00 in its direction
    let net_to_a: Decimal = repo
        .transactions_for_account(a.id)
        .unwrap()
        .iter()
        .map(|t| {
            if t.to_account_id == Some(a.id) {
                t.amount
            } else {
                -t.amount
            }
        })
        .sum();
    assert_eq!(balance_a, Decimal::new(5000, 2) + net_to_a);
}

/// Deposits to distinct accounts proceed side by side
#[test]
fn test_parallel_deposits_to_separate_accounts() {
    const THREADS: usize = 6;
    const ITERATIONS: usize = 5;

    let temp_dir = TempDir::new().unwrap();
    let (repo, ledger) = create_ledger(&temp_dir);
    let customer = Customer::new("Sam", "Tester", "sam@example.com");
    repo.insert_customer(&customer).unwrap();
    let accounts: Vec<_> = (0..THREADS)
        .map(|_| create_account(&repo, &customer, Decimal::ZERO))
        .collect();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = accounts
        .iter()
        .map(|account| {
            let barrier = Arc::clone(&barrier);
            let ledger = Arc::clone(&ledger);
            let id = account.id;
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS {
                    ledger.deposit(id, Decimal::new(125, 2)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for account in &accounts {
        assert_eq!(
            ledger.get_account(account.id).unwrap().balance,
            Decimal::new(125 * ITERATIONS as i64, 2)
        );
    }
    assert_eq!(repo.list_transactions().unwrap().len(), THREADS * ITERATIONS);
}
