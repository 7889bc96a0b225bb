//! Route table and shared request helpers

mod accounts;
mod customers;
mod transactions;
mod users;

use axum::routing::{get, post, put};
use axum::Router;

use bankdesk_core::domain::result::{Error, Result};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(users::health))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/auth/whoami", get(users::whoami))
        .route("/customers", post(customers::create_customer).get(customers::list_customers))
        .route("/customers/{id}", get(customers::get_customer))
        .route("/accounts", post(accounts::create_account).get(accounts::list_accounts))
        .route(
            "/accounts/{id}",
            get(accounts::get_account).delete(accounts::delete_account),
        )
        .route("/accounts/{id}/balance", put(accounts::adjust_balance))
        .route("/accounts/{id}/transactions", get(transactions::account_transactions))
        .route(
            "/transactions",
            post(transactions::create_transaction).get(transactions::list_transactions),
        )
        .route("/transactions/money_transfer", post(transactions::money_transfer))
        .route("/transactions/high_transactions", get(transactions::high_transactions))
        .route("/transactions/{id}", get(transactions::get_transaction))
        .with_state(state)
}

/// Unwrap a required request field
fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::validation(format!("Missing required field: {}", field)))
}
