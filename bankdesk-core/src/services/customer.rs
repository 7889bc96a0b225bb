//! Customer service - create and look up account owners

use std::sync::Arc;

use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::Customer;

pub struct CustomerService {
    repository: Arc<DuckDbRepository>,
}

impl CustomerService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    pub fn create_customer(&self, first_name: &str, last_name: &str, email: &str) -> Result<Customer> {
        let customer = Customer::new(first_name.trim(), last_name.trim(), email.trim());
        customer.validate()?;
        self.repository.insert_customer(&customer)?;
        tracing::info!(customer = %customer.id, "customer created");
        Ok(customer)
    }

    pub fn get_customer(&self, id: Uuid) -> Result<Customer> {
        self.repository
            .get_customer(id)?
            .ok_or_else(|| Error::not_found("Customer not found"))
    }

    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        self.repository.list_customers()
    }
}
