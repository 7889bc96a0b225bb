//! Account store port - owner of balance state

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::Account;

/// Balance state for accounts
///
/// No other component writes balances. Implementations must make
/// `adjust_balance` a single atomic read-modify-write: concurrent callers on
/// the same account never observe or overwrite each other's intermediate
/// state.
pub trait AccountStore: Send + Sync {
    /// Load an account, `Error::NotFound` if absent
    fn get_account(&self, id: Uuid) -> Result<Account>;

    /// Apply `delta` to the balance and return the new balance
    ///
    /// Fails with `Error::InsufficientFunds` (nothing persisted) if the
    /// result would be negative, `Error::NotFound` if the account is absent.
    fn adjust_balance(&self, id: Uuid, delta: Decimal) -> Result<Decimal>;

    /// Hard-delete an account that no ledger record references
    ///
    /// `Error::Conflict` if any transaction or adjustment mentions it,
    /// `Error::NotFound` if it does not exist.
    fn remove_account(&self, id: Uuid) -> Result<()>;
}
