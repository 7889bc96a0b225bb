//! Boundary validation for money amounts and identifiers

use rust_decimal::Decimal;
use uuid::Uuid;

use super::result::{Error, Result};

/// Number of fractional digits stored for every money column
pub const MONEY_SCALE: u32 = 2;

/// Integer digits that fit a `DECIMAL(18,2)` column
const MONEY_INTEGER_DIGITS: u32 = 16;

/// Smallest magnitude that no longer fits a money column (10^16)
pub fn money_limit() -> Decimal {
    Decimal::from_i128_with_scale(10_i128.pow(MONEY_INTEGER_DIGITS), 0)
}

/// Check that an amount or balance fits the storage range
pub fn within_range(amount: Decimal) -> Result<Decimal> {
    if amount.abs() >= money_limit() {
        return Err(Error::validation(format!(
            "Amount {} is out of range; values must stay below {}",
            amount,
            money_limit()
        )));
    }
    Ok(amount)
}

/// Validate a positive transaction amount
pub fn positive_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation("Amount must be greater than 0"));
    }
    within_scale(amount)
}

/// Validate a signed balance delta used by administrative adjustments
pub fn nonzero_delta(delta: Decimal) -> Result<Decimal> {
    if delta.is_zero() {
        return Err(Error::validation("Amount must not be zero"));
    }
    within_scale(delta)
}

fn within_scale(amount: Decimal) -> Result<Decimal> {
    let normalized = within_range(amount)?.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(Error::validation(format!(
            "Amount {} has more than {} decimal places",
            amount, MONEY_SCALE
        )));
    }
    Ok(normalized)
}

/// Parse an identifier supplied by a caller
///
/// `field` names the offending input in the error message.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid> {
    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| Error::validation(format!("Invalid UUID string for {}", field)))?;
    if id.is_nil() {
        return Err(Error::validation(format!("Invalid UUID string for {}", field)));
    }
    Ok(id)
}
