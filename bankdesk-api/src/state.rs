//! Shared handler state

use std::sync::Arc;

use bankdesk_core::domain::result::Result;
use bankdesk_core::{BankContext, Error};

use crate::error::{status_for, ApiError};

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<BankContext>,
}

impl AppState {
    pub fn new(ctx: Arc<BankContext>) -> Self {
        Self { ctx }
    }

    /// Run a blocking ledger call off the async executor
    ///
    /// Server-side failures are traced and written to the event log under
    /// `operation`.
    pub async fn run<T, F>(&self, operation: &'static str, f: F) -> std::result::Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&BankContext) -> Result<T> + Send + 'static,
    {
        let ctx = Arc::clone(&self.ctx);
        let result = tokio::task::spawn_blocking(move || f(&ctx))
            .await
            .map_err(|e| Error::database(format!("worker task failed: {}", e)))
            .and_then(|r| r);

        result.map_err(|e| {
            if status_for(&e).is_server_error() {
                tracing::error!(operation, error = %e, "request failed");
                if let Err(log_err) =
                    self.ctx
                        .logging_service
                        .log_error("request_failed", operation, Some(&e.to_string()))
                {
                    tracing::warn!(error = %log_err, "could not record request failure");
                }
            } else {
                tracing::debug!(operation, reason = e.reason(), "request rejected");
            }
            ApiError(e)
        })
    }
}
