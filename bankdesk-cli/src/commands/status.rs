//! Status command - show ledger totals

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output::{self, format_money};

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("status")?;
    let status = ctx.status_service.get_status()?;

    if json {
        return output::json(&status);
    }

    println!("{}", "Ledger Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Customers", &status.total_customers.to_string()]);
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Transactions", &status.total_transactions.to_string()]);
    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec!["Total balance", &format_money(status.total_balance)]);

    println!("{}", table);
    println!();

    if !status.by_type.is_empty() {
        println!("{}", "By Account Type".bold());
        let mut types = output::create_table();
        types.set_header(vec!["Type", "Accounts", "Balance"]);
        for summary in &status.by_type {
            types.add_row(vec![
                comfy_table::Cell::new(summary.account_type),
                comfy_table::Cell::new(summary.accounts),
                output::money_cell(summary.balance),
            ]);
        }
        println!("{}", types);
        println!();
    }

    if let Some(latest) = &status.latest_transaction {
        println!("Latest transaction: {}", latest);
    }
    if let Some(database) = &status.database {
        println!("Database: {}", database.dimmed());
    }

    Ok(())
}
