//! Serve command - run the HTTP API in the foreground

use std::sync::Arc;

use anyhow::{Context, Result};

use bankdesk_core::services::EntryPoint;
use bankdesk_core::BankContext;

use super::{get_data_dir, record_command};
use crate::output;

pub fn run(bind: Option<String>) -> Result<()> {
    let data_dir = get_data_dir();
    let ctx = BankContext::new(&data_dir, EntryPoint::Api)
        .context("Failed to initialize bankdesk context")?;
    record_command(&ctx, "serve");

    // --bind wins over settings.json and the environment override
    let bind_address = bind.unwrap_or_else(|| ctx.config.bind_address.clone());
    tracing::debug!(data_dir = %data_dir.display(), bind = %bind_address, "starting server");
    output::info(&format!("Serving bankdesk API on http://{}", bind_address));
    output::info("Press Ctrl-C to stop");

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(bankdesk_api::serve(Arc::new(ctx), &bind_address))
}
