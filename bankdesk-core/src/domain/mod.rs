//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod adjustment;
pub mod amount;
mod caller;
mod customer;
pub mod result;
mod transaction;
pub mod transfer;
mod user;

pub use account::{Account, AccountType};
pub use adjustment::BalanceAdjustment;
pub use caller::Caller;
pub use customer::Customer;
pub use transaction::{NewTransaction, Transaction, TransactionType};
pub use transfer::{TransferAttempt, TransferReceipt, TransferState};
pub use user::{Role, User};
