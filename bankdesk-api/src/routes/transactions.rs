//! Transaction endpoints, including the self-service money transfer

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bankdesk_core::domain::amount::parse_id;
use bankdesk_core::{CustomerVolume, Error, NewTransaction, Transaction, TransactionType};

use super::required;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MoneyTransferRequest {
    pub sender_account_id: Option<String>,
    pub receiver_account_id: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoneyTransferResponse {
    pub message: String,
    pub sender_account_id: Uuid,
    pub receiver_account_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub transaction_timestamp: String,
}

pub async fn money_transfer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(req): ApiJson<MoneyTransferRequest>,
) -> Result<(StatusCode, Json<MoneyTransferResponse>), ApiError> {
    let (Some(sender), Some(receiver), Some(amount)) =
        (req.sender_account_id, req.receiver_account_id, req.amount)
    else {
        return Err(Error::validation(
            "All fields are required: sender_account_id, receiver_account_id, amount",
        )
        .into());
    };
    let from = parse_id("sender_account_id", &sender)?;
    let to = parse_id("receiver_account_id", &receiver)?;

    let receipt = state
        .run("money_transfer", move |ctx| {
            ctx.ledger.transfer(from, to, amount, &caller)
        })
        .await?;

    let tx = receipt.transaction;
    Ok((
        StatusCode::CREATED,
        Json(MoneyTransferResponse {
            message: "Money transfer is successful".to_string(),
            sender_account_id: tx.from_account_id,
            receiver_account_id: to,
            transaction_type: tx.transaction_type,
            amount: tx.amount,
            transaction_timestamp: tx.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub transaction_type: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub message: String,
    pub transaction: Transaction,
}

/// Administrative transaction entry; applied through the ledger
pub async fn create_transaction(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(req): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreateTransactionResponse>), ApiError> {
    caller.require_admin()?;

    let from = parse_id("from_account_id", &required(req.from_account_id, "from_account_id")?)?;
    let transaction_type =
        TransactionType::from_str(&required(req.transaction_type, "transaction_type")?)?;
    let amount = required(req.amount, "amount")?;
    let to = req
        .to_account_id
        .map(|raw| parse_id("to_account_id", &raw))
        .transpose()?;

    let record = NewTransaction {
        from_account_id: from,
        to_account_id: to,
        transaction_type,
        amount,
    };
    let transaction = state
        .run("create_transaction", move |ctx| ctx.ledger.record(record, &caller))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            message: "Transaction created successfully".to_string(),
            transaction,
        }),
    ))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    caller.require_admin()?;
    let transactions = state
        .run("list_transactions", |ctx| ctx.account_service.list_transactions())
        .await?;
    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(raw_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    caller.require_admin()?;
    let id = parse_id("transaction_id", &raw_id)?;
    let transaction = state
        .run("get_transaction", move |ctx| ctx.account_service.get_transaction(id))
        .await?;
    Ok(Json(transaction))
}

pub async fn account_transactions(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    caller.require_admin()?;
    let id = parse_id("account_id", &raw_id)?;
    let transactions = state
        .run("account_transactions", move |ctx| ctx.account_service.history(id))
        .await?;
    Ok(Json(transactions))
}

#[derive(Debug, Deserialize)]
pub struct HighTransactionsQuery {
    pub min_transaction_total: Option<String>,
}

pub async fn high_transactions(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Query(query): Query<HighTransactionsQuery>,
) -> Result<Json<Vec<CustomerVolume>>, ApiError> {
    caller.require_admin()?;
    let threshold = query
        .min_transaction_total
        .map(|raw| {
            Decimal::from_str(raw.trim())
                .map_err(|_| Error::validation("min_transaction_total must be a number"))
        })
        .transpose()?;

    let customers = state
        .run("high_transactions", move |ctx| {
            ctx.report_service.high_volume_customers(threshold)
        })
        .await?;
    Ok(Json(customers))
}
