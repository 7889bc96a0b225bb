//! Result and error types for the core library

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Core library error type
///
/// Variants map one-to-one onto the failure classes the ledger reports to
/// callers. Everything except `PartialFailure` and `Database` is raised
/// before any balance has been touched.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Insufficient funds in account {account_id}: balance {balance}, requested change {delta}")]
    InsufficientFunds {
        account_id: Uuid,
        balance: Decimal,
        delta: Decimal,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A mutation committed but its paired log entry or compensating leg did not
    #[error("Partial failure: {0}")]
    PartialFailure(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn partial_failure(msg: impl Into<String>) -> Self {
        Self::PartialFailure(msg.into())
    }

    /// Machine-readable reason code, stable across releases
    pub fn reason(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::NotFound(_) => "not_found",
            Error::Forbidden(_) => "forbidden",
            Error::Unauthorized(_) => "unauthorized",
            Error::InsufficientFunds { .. } => "insufficient_funds",
            Error::Conflict(_) => "conflict",
            Error::PartialFailure(_) => "partial_failure",
            Error::Database(_) | Error::Io(_) | Error::Json(_) | Error::Config(_) => {
                "infrastructure_error"
            }
        }
    }

    /// True when a balance may have changed without its paired record
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, Error::PartialFailure(_))
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
