//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces the ledger depends on. The engine is generic
//! over these traits, not over a concrete database.

mod account_store;
mod identity;
mod transaction_log;

pub use account_store::AccountStore;
pub use identity::IdentityResolver;
pub use transaction_log::TransactionLog;
