//! DuckDB repository implementation
//!
//! One connection behind a mutex. Every method holds the guard for its whole
//! body, so each call is a scoped acquisition that is released on every exit
//! path, and multi-statement operations run inside a DuckDB transaction that
//! rolls back when dropped uncommitted.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::{params, Connection, Row};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::amount::within_range;
use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, AccountType, BalanceAdjustment, Caller, Customer, NewTransaction, Role, Transaction,
    TransactionType, User,
};
use crate::ports::{AccountStore, IdentityResolver, TransactionLog};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

const ACCOUNT_COLUMNS: &str = "account_id, customer_id, account_type, CAST(balance AS VARCHAR), branch_id, created_at";

const TRANSACTION_COLUMNS: &str = "transaction_id, from_account_id, to_account_id, transaction_type, CAST(amount AS VARCHAR), transaction_timestamp";

const USER_COLUMNS: &str = "user_id, username, password_hash, role, customer_id, created_at";

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) the database file at `db_path`
    ///
    /// Retries with exponential backoff while another process holds the file
    /// lock.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut attempt = 0;
        loop {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) if is_retryable_error(&e.to_string()) && attempt < MAX_RETRIES - 1 => {
                    let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                    tracing::warn!(
                        attempt = attempt + 1,
                        max = MAX_RETRIES,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "database busy, retrying"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Open a private in-memory database (tests, demos)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extensions are never needed; keep DuckDB from fetching any at runtime
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let result = self.run_migrations()?;
        if !result.applied.is_empty() {
            tracing::info!(applied = ?result.applied, "database schema upgraded");
        }
        Ok(())
    }

    // === Customer operations ===

    pub fn insert_customer(&self, customer: &Customer) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_customers (customer_id, first_name, last_name, email, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                customer.id.to_string(),
                customer.first_name,
                customer.last_name,
                customer.email,
                format_timestamp(&customer.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_customer(&self, id: Uuid) -> Result<Option<Customer>> {
        let conn = self.lock()?;
        let raw = query_optional(
            &conn,
            "SELECT customer_id, first_name, last_name, email, created_at
             FROM sys_customers WHERE customer_id = ?",
            params![id.to_string()],
            CustomerRow::read,
        )?;
        raw.map(CustomerRow::into_customer).transpose()
    }

    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT customer_id, first_name, last_name, email, created_at
             FROM sys_customers ORDER BY last_name, first_name",
        )?;
        let rows = stmt.query_map([], CustomerRow::read)?;
        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?.into_customer()?);
        }
        Ok(customers)
    }

    // === Account operations ===

    pub fn insert_account(&self, account: &Account) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_accounts (account_id, customer_id, account_type, balance, branch_id, created_at)
             VALUES (?, ?, ?, CAST(? AS DECIMAL(18,2)), ?, ?)",
            params![
                account.id.to_string(),
                account.customer_id.to_string(),
                account.account_type.as_str(),
                account.balance.to_string(),
                account.branch_id.to_string(),
                format_timestamp(&account.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_account(&self, id: Uuid) -> Result<Option<Account>> {
        let conn = self.lock()?;
        select_account(&conn, id)
    }

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_accounts ORDER BY created_at",
            ACCOUNT_COLUMNS
        ))?;
        let rows = stmt.query_map([], AccountRow::read)?;
        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?.into_account()?);
        }
        Ok(accounts)
    }

    pub fn account_ids_for_customer(&self, customer_id: Uuid) -> Result<Vec<Uuid>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT account_id FROM sys_accounts WHERE customer_id = ?")?;
        let rows = stmt.query_map(params![customer_id.to_string()], |row| row.get::<_, String>(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(parse_uuid(&row?)?);
        }
        Ok(ids)
    }

    /// Hard-delete an account that no ledger record references
    ///
    /// `Error::Conflict` if any transaction or adjustment mentions it,
    /// `Error::NotFound` if it does not exist.
    pub fn delete_account(&self, id: Uuid) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let id_str = id.to_string();

        let references: i64 = tx.query_row(
            "SELECT (SELECT COUNT(*) FROM sys_transactions
                     WHERE from_account_id = ? OR to_account_id = ?)
                  + (SELECT COUNT(*) FROM sys_balance_adjustments WHERE account_id = ?)",
            params![id_str, id_str, id_str],
            |row| row.get(0),
        )?;
        if references > 0 {
            return Err(Error::conflict(format!(
                "Account {} is referenced by {} ledger records and cannot be deleted",
                id, references
            )));
        }

        let deleted = tx.execute("DELETE FROM sys_accounts WHERE account_id = ?", params![id_str])?;
        if deleted == 0 {
            return Err(Error::not_found(format!("Account not found: {}", id)));
        }
        tx.commit()?;
        Ok(())
    }

    // === Transaction operations ===

    pub fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        let conn = self.lock()?;
        let raw = query_optional(
            &conn,
            &format!(
                "SELECT {} FROM sys_transactions WHERE transaction_id = ?",
                TRANSACTION_COLUMNS
            ),
            params![id.to_string()],
            TransactionRow::read,
        )?;
        raw.map(TransactionRow::into_transaction).transpose()
    }

    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_transactions ORDER BY transaction_timestamp",
            TRANSACTION_COLUMNS
        ))?;
        let rows = stmt.query_map([], TransactionRow::read)?;
        collect_transactions(rows)
    }

    /// Transactions where `account_id` is either the source or the destination
    pub fn transactions_for_account(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        let conn = self.lock()?;
        let id = account_id.to_string();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_transactions
             WHERE from_account_id = ? OR to_account_id = ?
             ORDER BY transaction_timestamp",
            TRANSACTION_COLUMNS
        ))?;
        let rows = stmt.query_map(params![id, id], TransactionRow::read)?;
        collect_transactions(rows)
    }

    /// Customers whose accounts appear in transactions totalling more than `min_total`
    ///
    /// A transfer between two accounts of the same customer counts once.
    pub fn customers_with_volume_above(&self, min_total: Decimal) -> Result<Vec<CustomerVolume>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT c.customer_id, c.first_name, c.last_name, CAST(SUM(v.amount) AS VARCHAR)
             FROM sys_customers c
             JOIN (
                 SELECT DISTINCT a.customer_id, t.transaction_id, t.amount
                 FROM sys_accounts a
                 JOIN sys_transactions t
                   ON a.account_id = t.from_account_id OR a.account_id = t.to_account_id
             ) v ON c.customer_id = v.customer_id
             GROUP BY c.customer_id, c.first_name, c.last_name
             HAVING SUM(v.amount) > CAST(? AS DECIMAL(18,2))
             ORDER BY SUM(v.amount) DESC",
        )?;
        let rows = stmt.query_map(params![min_total.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (id, first_name, last_name, total) = row?;
            result.push(CustomerVolume {
                customer_id: parse_uuid(&id)?,
                first_name,
                last_name,
                total_transaction: parse_decimal(&total)?,
            });
        }
        Ok(result)
    }

    // === Adjustment audit ===

    pub fn adjustments_for_account(&self, account_id: Uuid) -> Result<Vec<BalanceAdjustment>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT adjustment_id, account_id, CAST(delta AS VARCHAR), CAST(new_balance AS VARCHAR),
                    actor_user_id, reason, adjusted_at
             FROM sys_balance_adjustments WHERE account_id = ? ORDER BY adjusted_at",
        )?;
        let rows = stmt.query_map(params![account_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (id, account, delta, new_balance, actor, reason, at) = row?;
            result.push(BalanceAdjustment {
                id: parse_uuid(&id)?,
                account_id: parse_uuid(&account)?,
                delta: parse_decimal(&delta)?,
                new_balance: parse_decimal(&new_balance)?,
                actor: actor.as_deref().map(parse_uuid).transpose()?,
                reason,
                timestamp: parse_timestamp(&at)?,
            });
        }
        Ok(result)
    }

    // === User operations ===

    /// Insert a user; `Error::Conflict` if the username is taken
    pub fn insert_user(&self, user: &User) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let taken: i64 = tx.query_row(
            "SELECT COUNT(*) FROM sys_users WHERE username = ?",
            params![user.username],
            |row| row.get(0),
        )?;
        if taken > 0 {
            return Err(Error::conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        tx.execute(
            "INSERT INTO sys_users (user_id, username, password_hash, role, customer_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.role.as_str(),
                user.customer_id.map(|c| c.to_string()),
                format_timestamp(&user.created_at),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.lock()?;
        let raw = query_optional(
            &conn,
            &format!("SELECT {} FROM sys_users WHERE user_id = ?", USER_COLUMNS),
            params![id.to_string()],
            UserRow::read,
        )?;
        raw.map(UserRow::into_user).transpose()
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.lock()?;
        let raw = query_optional(
            &conn,
            &format!("SELECT {} FROM sys_users WHERE username = ?", USER_COLUMNS),
            params![username],
            UserRow::read,
        )?;
        raw.map(UserRow::into_user).transpose()
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_users ORDER BY created_at, username",
            USER_COLUMNS
        ))?;
        let rows = stmt.query_map([], UserRow::read)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?.into_user()?);
        }
        Ok(users)
    }

    // === Summary ===

    pub fn get_counts(&self) -> Result<RepositoryCounts> {
        let conn = self.lock()?;
        let (customers, accounts, transactions, users, total_balance) = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM sys_customers),
                    (SELECT COUNT(*) FROM sys_accounts),
                    (SELECT COUNT(*) FROM sys_transactions),
                    (SELECT COUNT(*) FROM sys_users),
                    CAST((SELECT COALESCE(SUM(balance), 0) FROM sys_accounts) AS VARCHAR)",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )?;
        Ok(RepositoryCounts {
            customers,
            accounts,
            transactions,
            users,
            total_balance: parse_decimal(&total_balance)?,
        })
    }
}

impl AccountStore for DuckDbRepository {
    fn get_account(&self, id: Uuid) -> Result<Account> {
        self.find_account(id)?
            .ok_or_else(|| Error::not_found(format!("Account not found: {}", id)))
    }

    fn adjust_balance(&self, id: Uuid, delta: Decimal) -> Result<Decimal> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let current = query_optional(
            &tx,
            "SELECT CAST(balance AS VARCHAR) FROM sys_accounts WHERE account_id = ?",
            params![id.to_string()],
            |row| row.get::<_, String>(0),
        )?
        .ok_or_else(|| Error::not_found(format!("Account not found: {}", id)))?;
        let balance = parse_decimal(&current)?;

        let next = balance
            .checked_add(delta)
            .ok_or_else(|| Error::validation("Resulting balance is out of range"))
            .and_then(within_range)?;
        if next < Decimal::ZERO {
            // tx drops here and rolls back; nothing was written
            return Err(Error::InsufficientFunds {
                account_id: id,
                balance,
                delta,
            });
        }

        tx.execute(
            "UPDATE sys_accounts SET balance = CAST(? AS DECIMAL(18,2)) WHERE account_id = ?",
            params![next.to_string(), id.to_string()],
        )?;
        tx.commit()?;
        Ok(next)
    }

    fn remove_account(&self, id: Uuid) -> Result<()> {
        self.delete_account(id)
    }
}

impl TransactionLog for DuckDbRepository {
    fn append(&self, record: NewTransaction) -> Result<Transaction> {
        let tx = Transaction::from_new(record);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_transactions (transaction_id, from_account_id, to_account_id,
                                           transaction_type, amount, transaction_timestamp)
             VALUES (?, ?, ?, ?, CAST(? AS DECIMAL(18,2)), ?)",
            params![
                tx.id.to_string(),
                tx.from_account_id.to_string(),
                tx.to_account_id.map(|id| id.to_string()),
                tx.transaction_type.as_str(),
                tx.amount.to_string(),
                format_timestamp(&tx.timestamp),
            ],
        )?;
        Ok(tx)
    }

    fn record_adjustment(&self, entry: &BalanceAdjustment) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_balance_adjustments (adjustment_id, account_id, delta, new_balance,
                                                  actor_user_id, reason, adjusted_at)
             VALUES (?, ?, CAST(? AS DECIMAL(18,2)), CAST(? AS DECIMAL(18,2)), ?, ?, ?)",
            params![
                entry.id.to_string(),
                entry.account_id.to_string(),
                entry.delta.to_string(),
                entry.new_balance.to_string(),
                entry.actor.map(|a| a.to_string()),
                entry.reason,
                format_timestamp(&entry.timestamp),
            ],
        )?;
        Ok(())
    }
}

impl IdentityResolver for DuckDbRepository {
    fn resolve_caller(&self, user_id: Uuid) -> Result<Caller> {
        let user = self
            .get_user(user_id)?
            .ok_or_else(|| Error::not_found(format!("User not found: {}", user_id)))?;

        match (user.role, user.customer_id) {
            (Role::Admin, _) => Ok(Caller::admin(user.id)),
            (Role::User, None) => Ok(Caller {
                user_id: user.id,
                role: Role::User,
                customer_id: None,
                owned_accounts: Default::default(),
            }),
            (Role::User, Some(customer_id)) => {
                if self.get_customer(customer_id)?.is_none() {
                    return Err(Error::not_found(
                        "No customer exists with this customer_id",
                    ));
                }
                let owned = self.account_ids_for_customer(customer_id)?;
                Ok(Caller::customer(user.id, customer_id, owned))
            }
        }
    }
}

/// Aggregate transaction volume for one customer
#[derive(Debug, Clone, Serialize)]
pub struct CustomerVolume {
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub total_transaction: Decimal,
}

/// Row counts used by the status summary
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryCounts {
    pub customers: i64,
    pub accounts: i64,
    pub transactions: i64,
    pub users: i64,
    pub total_balance: Decimal,
}

// === Row mapping ===
//
// duckdb closures can only fail with duckdb::Error, so rows are read as raw
// strings first and parsed into domain types outside the closure.

struct CustomerRow(String, String, String, String, String);

impl CustomerRow {
    fn read(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    }

    fn into_customer(self) -> Result<Customer> {
        Ok(Customer {
            id: parse_uuid(&self.0)?,
            first_name: self.1,
            last_name: self.2,
            email: self.3,
            created_at: parse_timestamp(&self.4)?,
        })
    }
}

struct AccountRow(String, String, String, String, String, String);

impl AccountRow {
    fn read(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self(
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: parse_uuid(&self.0)?,
            customer_id: parse_uuid(&self.1)?,
            account_type: AccountType::from_str(&self.2)?,
            balance: parse_decimal(&self.3)?,
            branch_id: parse_uuid(&self.4)?,
            created_at: parse_timestamp(&self.5)?,
        })
    }
}

struct TransactionRow(String, String, Option<String>, String, String, String);

impl TransactionRow {
    fn read(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self(
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn into_transaction(self) -> Result<Transaction> {
        Ok(Transaction {
            id: parse_uuid(&self.0)?,
            from_account_id: parse_uuid(&self.1)?,
            to_account_id: self.2.as_deref().map(parse_uuid).transpose()?,
            transaction_type: TransactionType::from_str(&self.3)?,
            amount: parse_decimal(&self.4)?,
            timestamp: parse_timestamp(&self.5)?,
        })
    }
}

struct UserRow(String, String, String, String, Option<String>, String);

impl UserRow {
    fn read(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self(
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn into_user(self) -> Result<User> {
        Ok(User {
            id: parse_uuid(&self.0)?,
            username: self.1,
            password_hash: self.2,
            role: Role::from_str(&self.3)?,
            customer_id: self.4.as_deref().map(parse_uuid).transpose()?,
            created_at: parse_timestamp(&self.5)?,
        })
    }
}

fn select_account(conn: &Connection, id: Uuid) -> Result<Option<Account>> {
    let raw = query_optional(
        conn,
        &format!("SELECT {} FROM sys_accounts WHERE account_id = ?", ACCOUNT_COLUMNS),
        params![id.to_string()],
        AccountRow::read,
    )?;
    raw.map(AccountRow::into_account).transpose()
}

fn collect_transactions<I>(rows: I) -> Result<Vec<Transaction>>
where
    I: Iterator<Item = duckdb::Result<TransactionRow>>,
{
    let mut result = Vec::new();
    for row in rows {
        result.push(row?.into_transaction()?);
    }
    Ok(result)
}

/// Run a query expected to return at most one row
fn query_optional<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> Result<Option<T>>
where
    P: duckdb::Params,
    F: FnOnce(&Row<'_>) -> duckdb::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(f(row)?)),
        None => Ok(None),
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::database(format!("corrupt identifier '{}': {}", s, e)))
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).map_err(|e| Error::database(format!("corrupt amount '{}': {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::database(format!("corrupt timestamp '{}': {}", s, e)))
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}
