//! CLI command implementations

pub mod account;
pub mod customer;
pub mod ledger;
pub mod logs;
pub mod serve;
pub mod status;
pub mod user;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use uuid::Uuid;

use bankdesk_core::domain::amount::parse_id;
use bankdesk_core::services::EntryPoint;
use bankdesk_core::{BankContext, Caller};

/// Get the data directory from environment or default
pub fn get_data_dir() -> PathBuf {
    bankdesk_core::config::default_data_dir()
}

/// Open the ledger for a CLI command and record the command in the event log
pub fn get_context(command: &str) -> Result<BankContext> {
    let data_dir = get_data_dir();
    let ctx = BankContext::new(&data_dir, EntryPoint::Cli)
        .context("Failed to initialize bankdesk context")?;
    record_command(&ctx, command);
    Ok(ctx)
}

/// Record a command in the event log; the event log never fails a command
pub fn record_command(ctx: &BankContext, command: &str) {
    if let Err(e) = ctx.logging_service.log_command(command) {
        tracing::debug!(error = %e, "event log unavailable");
    }
}

/// The console operator
///
/// Whoever can open the database file already has full control of it, so
/// local commands run with administrator capabilities. The nil id marks
/// console actions in audit entries.
pub fn operator() -> Caller {
    Caller::admin(Uuid::nil())
}

pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid> {
    Ok(parse_id(field, raw)?)
}

pub fn parse_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).with_context(|| format!("Invalid amount: {}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 40.00 ").unwrap(), Decimal::new(4000, 2));
        assert_eq!(parse_amount("-2.5").unwrap(), Decimal::new(-25, 1));
        assert!(parse_amount("forty").is_err());
    }

    #[test]
    fn test_parse_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid("account_id", &id.to_string()).unwrap(), id);
        let err = parse_uuid("account_id", "123").unwrap_err();
        assert!(err.to_string().contains("account_id"));
    }
}
