//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for AccountStore, TransactionLog and IdentityResolver

pub mod duckdb;
