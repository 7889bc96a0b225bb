//! Balance-affecting commands: deposit, withdraw, transfer, adjust, history

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;

use rust_decimal::Decimal;
use uuid::Uuid;

use bankdesk_core::{Transaction, TransactionType};

use super::{get_context, operator, parse_amount, parse_uuid};
use crate::output::{self, format_money, format_time};

pub fn deposit(account: &str, amount: &str, json: bool) -> Result<()> {
    let account_id = parse_uuid("account_id", account)?;
    let amount = parse_amount(amount)?;

    let ctx = get_context("deposit")?;
    let tx = ctx.ledger.deposit(account_id, amount)?;
    let balance = ctx.ledger.get_account(account_id)?.balance;

    if json {
        return output::json(&serde_json::json!({ "transaction": tx, "balance": balance }));
    }
    output::success(&format!("Deposited {} into {}", format_money(amount), account_id));
    println!("  New balance: {}", format_money(balance));
    Ok(())
}

pub fn withdraw(account: &str, amount: &str, json: bool) -> Result<()> {
    let account_id = parse_uuid("account_id", account)?;
    let amount = parse_amount(amount)?;

    let ctx = get_context("withdraw")?;
    let tx = ctx.ledger.withdraw(account_id, amount)?;
    let balance = ctx.ledger.get_account(account_id)?.balance;

    if json {
        return output::json(&serde_json::json!({ "transaction": tx, "balance": balance }));
    }
    output::success(&format!("Withdrew {} from {}", format_money(amount), account_id));
    println!("  New balance: {}", format_money(balance));
    Ok(())
}

pub fn transfer(from: &str, to: &str, amount: &str, json: bool) -> Result<()> {
    let from = parse_uuid("from_account_id", from)?;
    let to = parse_uuid("to_account_id", to)?;
    let amount = parse_amount(amount)?;

    let ctx = get_context("transfer")?;
    let receipt = ctx.ledger.transfer(from, to, amount, &operator())?;

    if json {
        return output::json(&receipt);
    }
    let states: Vec<String> = receipt.states.iter().map(|s| s.to_string()).collect();
    output::success(&format!(
        "Transferred {} from {} to {}",
        format_money(amount),
        from,
        to
    ));
    println!("  Transaction: {}", receipt.transaction.id);
    println!("  States: {}", states.join(" -> ").dimmed());
    Ok(())
}

pub fn adjust(account: &str, delta: &str, reason: Option<String>, json: bool) -> Result<()> {
    let account_id = parse_uuid("account_id", account)?;
    let delta = parse_amount(delta)?;

    let ctx = get_context("adjust")?;
    let entry = ctx
        .ledger
        .adjust_balance(account_id, delta, &operator(), reason)?;

    if json {
        return output::json(&entry);
    }
    output::success(&format!(
        "Adjusted {} by {}",
        account_id,
        format_money(entry.delta)
    ));
    println!("  New balance: {}", format_money(entry.new_balance));
    Ok(())
}

pub fn history(account: &str, json: bool) -> Result<()> {
    let account_id = parse_uuid("account_id", account)?;

    let ctx = get_context("history")?;
    let transactions = ctx.account_service.history(account_id)?;

    if json {
        return output::json(&transactions);
    }
    if transactions.is_empty() {
        println!("No transactions for {}.", account_id);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Type", "Amount", "Counterparty", "ID"]);
    for tx in &transactions {
        table.add_row(vec![
            Cell::new(format_time(&tx.timestamp)),
            Cell::new(tx.transaction_type),
            output::money_cell(signed_amount(tx, account_id)),
            Cell::new(counterparty(tx, account_id).map(|id| id.to_string()).unwrap_or_default()),
            Cell::new(tx.id),
        ]);
    }
    println!("{}", table);
    Ok(())
}

/// Amount as seen from `account_id`: money leaving the account is negative
fn signed_amount(tx: &Transaction, account_id: Uuid) -> Decimal {
    match tx.transaction_type {
        TransactionType::Deposit => tx.amount,
        TransactionType::Withdrawal => -tx.amount,
        TransactionType::Transfer if tx.from_account_id == account_id => -tx.amount,
        TransactionType::Transfer => tx.amount,
    }
}

fn counterparty(tx: &Transaction, account_id: Uuid) -> Option<Uuid> {
    match tx.transaction_type {
        TransactionType::Transfer if tx.from_account_id == account_id => tx.to_account_id,
        TransactionType::Transfer => Some(tx.from_account_id),
        _ => None,
    }
}
