//! Report service - transaction volume reporting

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::adapters::duckdb::{CustomerVolume, DuckDbRepository};
use crate::domain::result::{Error, Result};

/// Threshold used when the caller does not give one
pub const DEFAULT_HIGH_VOLUME_THRESHOLD: i64 = 10_000;

pub struct ReportService {
    repository: Arc<DuckDbRepository>,
}

impl ReportService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Customers whose summed transaction amounts exceed `min_total`
    ///
    /// Transfers count toward both the sending and the receiving customer.
    /// An empty result is `Error::NotFound`.
    pub fn high_volume_customers(&self, min_total: Option<Decimal>) -> Result<Vec<CustomerVolume>> {
        let threshold = min_total.unwrap_or(Decimal::from(DEFAULT_HIGH_VOLUME_THRESHOLD));
        if threshold < Decimal::ZERO {
            return Err(Error::validation("min_transaction_total must not be negative"));
        }
        let customers = self.repository.customers_with_volume_above(threshold)?;
        if customers.is_empty() {
            return Err(Error::not_found(
                "No customers found with transactions exceeding the specified amount.",
            ));
        }
        Ok(customers)
    }
}
