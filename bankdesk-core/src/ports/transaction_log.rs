//! Transaction log port - append-only record of balance changes

use crate::domain::result::Result;
use crate::domain::{BalanceAdjustment, NewTransaction, Transaction};

/// Append-only ledger history
///
/// Appends fail only for infrastructure reasons; callers validate records
/// before handing them over.
pub trait TransactionLog: Send + Sync {
    /// Assign an id and timestamp to `record` and persist it
    fn append(&self, record: NewTransaction) -> Result<Transaction>;

    /// Persist an audit entry for an administrative correction
    fn record_adjustment(&self, entry: &BalanceAdjustment) -> Result<()>;
}
