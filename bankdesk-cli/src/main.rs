//! Bankdesk CLI - back-office ledger operations from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{account, customer, ledger, logs, serve, status, user};

/// Bankdesk - back-office banking ledger
#[derive(Parser)]
#[command(name = "bd", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ledger totals
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage customers
    Customer {
        #[command(subcommand)]
        command: customer::CustomerCommands,
    },

    /// Manage accounts
    Account {
        #[command(subcommand)]
        command: account::AccountCommands,
    },

    /// Manage API users
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },

    /// Deposit money into an account
    Deposit {
        account_id: String,
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw money from an account
    Withdraw {
        account_id: String,
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move money between two accounts
    Transfer {
        from_account_id: String,
        to_account_id: String,
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a signed manual correction to a balance
    Adjust {
        account_id: String,
        /// Signed change, e.g. 25.00 or -10.50
        #[arg(allow_hyphen_values = true)]
        delta: String,
        /// Reason recorded with the adjustment
        #[arg(long)]
        reason: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show transactions touching an account
    History {
        account_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the operational event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Run the HTTP API
    Serve {
        /// Address to bind, overrides settings.json
        #[arg(long)]
        bind: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            let needs_reconciliation = e
                .downcast_ref::<bankdesk_core::Error>()
                .is_some_and(|err| err.needs_reconciliation());
            if needs_reconciliation {
                output::warning(
                    "The ledger may be inconsistent. See `bd logs list --event ledger_partial_failure`.",
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Customer { command } => customer::run(command),
        Commands::Account { command } => account::run(command),
        Commands::User { command } => user::run(command),
        Commands::Deposit { account_id, amount, json } => {
            ledger::deposit(&account_id, &amount, json)
        }
        Commands::Withdraw { account_id, amount, json } => {
            ledger::withdraw(&account_id, &amount, json)
        }
        Commands::Transfer {
            from_account_id,
            to_account_id,
            amount,
            json,
        } => ledger::transfer(&from_account_id, &to_account_id, &amount, json),
        Commands::Adjust {
            account_id,
            delta,
            reason,
            json,
        } => ledger::adjust(&account_id, &delta, reason, json),
        Commands::History { account_id, json } => ledger::history(&account_id, json),
        Commands::Logs { command } => logs::run(command),
        Commands::Serve { bind } => serve::run(bind),
    }
}
