//! Account commands

use std::str::FromStr;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::Cell;
use dialoguer::Confirm;

use bankdesk_core::AccountType;

use super::{get_context, operator, parse_uuid};
use crate::output::{self, format_money, format_time};

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open an account for an existing customer
    New {
        /// Owning customer ID
        #[arg(long)]
        customer_id: String,
        /// CHECKING or SAVINGS
        #[arg(long = "type", default_value = "CHECKING")]
        account_type: String,
        /// Branch ID
        #[arg(long)]
        branch_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one account and its adjustments
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an account with no transactions
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

pub fn run(command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::New {
            customer_id,
            account_type,
            branch_id,
            json,
        } => {
            let customer_id = parse_uuid("customer_id", &customer_id)?;
            let branch_id = parse_uuid("branch_id", &branch_id)?;
            let account_type = AccountType::from_str(&account_type)?;

            let ctx = get_context("account new")?;
            let account = ctx
                .account_service
                .open_account(customer_id, account_type, branch_id)?;
            if json {
                return output::json(&account);
            }
            output::success(&format!("Opened {} account {}", account.account_type, account.id));
        }
        AccountCommands::List { json } => {
            let ctx = get_context("account list")?;
            let accounts = ctx.account_service.list_accounts()?;
            if json {
                return output::json(&accounts);
            }
            if accounts.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Customer", "Type", "Balance", "Branch"]);
            for account in &accounts {
                table.add_row(vec![
                    Cell::new(account.id),
                    Cell::new(account.customer_id),
                    Cell::new(account.account_type),
                    output::money_cell(account.balance),
                    Cell::new(account.branch_id),
                ]);
            }
            println!("{}", table);
        }
        AccountCommands::Show { id, json } => {
            let id = parse_uuid("account_id", &id)?;
            let ctx = get_context("account show")?;
            let account = ctx.ledger.get_account(id)?;
            let adjustments = ctx.account_service.adjustments(id)?;

            if json {
                return output::json(&serde_json::json!({
                    "account": account,
                    "adjustments": adjustments,
                }));
            }

            println!("{}", format!("Account {}", account.id).bold());
            println!("  Customer: {}", account.customer_id);
            println!("  Type:     {}", account.account_type);
            println!("  Branch:   {}", account.branch_id);
            println!("  Opened:   {}", format_time(&account.created_at));
            println!("  Balance:  {}", format_money(account.balance).bold());

            if !adjustments.is_empty() {
                println!();
                println!("{}", "Manual Adjustments".bold());
                let mut table = output::create_table();
                table.set_header(vec!["Time", "Delta", "New balance", "Reason"]);
                for entry in &adjustments {
                    table.add_row(vec![
                        Cell::new(format_time(&entry.timestamp)),
                        output::money_cell(entry.delta),
                        output::money_cell(entry.new_balance),
                        Cell::new(entry.reason.as_deref().unwrap_or("")),
                    ]);
                }
                println!("{}", table);
            }
        }
        AccountCommands::Delete { id, force } => {
            let id = parse_uuid("account_id", &id)?;
            let ctx = get_context("account delete")?;
            let account = ctx.ledger.get_account(id)?;

            if !force
                && !Confirm::new()
                    .with_prompt(format!(
                        "Delete {} account {} (balance {})?",
                        account.account_type,
                        account.id,
                        format_money(account.balance)
                    ))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            ctx.ledger.delete_account(id, &operator())?;
            output::success("Account deleted");
        }
    }
    Ok(())
}
