//! Customer commands

use anyhow::Result;
use clap::Subcommand;
use comfy_table::Cell;

use super::get_context;
use crate::output::{self, format_time};

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Register a new customer
    New {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List customers
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: CustomerCommands) -> Result<()> {
    match command {
        CustomerCommands::New {
            first_name,
            last_name,
            email,
            json,
        } => {
            let ctx = get_context("customer new")?;
            let customer = ctx
                .customer_service
                .create_customer(&first_name, &last_name, &email)?;
            if json {
                return output::json(&customer);
            }
            output::success(&format!("Created customer {}", customer.full_name()));
            println!("  ID: {}", customer.id);
        }
        CustomerCommands::List { json } => {
            let ctx = get_context("customer list")?;
            let customers = ctx.customer_service.list_customers()?;
            if json {
                return output::json(&customers);
            }
            if customers.is_empty() {
                println!("No customers found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Email", "Created"]);
            for customer in &customers {
                table.add_row(vec![
                    Cell::new(customer.id),
                    Cell::new(customer.full_name()),
                    Cell::new(&customer.email),
                    Cell::new(format_time(&customer.created_at)),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}
