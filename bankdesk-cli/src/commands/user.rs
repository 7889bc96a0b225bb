//! User commands

use std::str::FromStr;

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Password;

use bankdesk_core::Role;

use super::{get_context, operator, parse_uuid};
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a login for the HTTP API
    New {
        username: String,
        /// USER or ADMIN
        #[arg(long, default_value = "USER")]
        role: String,
        /// Customer this user acts for
        #[arg(long)]
        customer_id: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, short)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: UserCommands) -> Result<()> {
    match command {
        UserCommands::New {
            username,
            role,
            customer_id,
            password,
            json,
        } => {
            let role = Role::from_str(&role)?;
            let customer_id = customer_id
                .map(|raw| parse_uuid("customer_id", &raw))
                .transpose()?;

            let password = match password {
                Some(p) => p,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()?,
            };

            let ctx = get_context("user new")?;
            let user = ctx
                .user_service
                .register(&username, &password, role, customer_id, Some(&operator()))?;
            if json {
                return output::json(&user);
            }
            output::success(&format!("Created {} user '{}'", user.role, user.username));
            if user.customer_id.is_none() && user.role == Role::User {
                output::warning("User has no customer binding and cannot transfer money");
            }
        }
    }
    Ok(())
}
