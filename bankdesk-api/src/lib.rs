//! Bankdesk API - thin HTTP layer over bankdesk-core
//!
//! Handlers authenticate the caller, validate the request shape and
//! identifiers, then hand off to the ledger on the blocking pool. All
//! business rules live in the core crate.

pub mod auth;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;

use bankdesk_core::BankContext;

pub use error::{ApiError, ErrorBody};
pub use state::AppState;

/// Build the application router over `ctx`
pub fn app(ctx: Arc<BankContext>) -> Router {
    routes::router(AppState::new(ctx))
}

/// Serve the API on `bind_address` until Ctrl-C
pub async fn serve(ctx: Arc<BankContext>, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    let local = listener.local_addr()?;
    tracing::info!(address = %local, "bankdesk API listening");

    if let Err(e) = ctx.logging_service.log_event("server_started") {
        tracing::warn!(error = %e, "could not record server start");
    }

    axum::serve(listener, app(ctx).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("bankdesk API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
