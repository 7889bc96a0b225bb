//! Account administration and balance adjustment

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bankdesk_core::domain::amount::parse_id;
use bankdesk_core::{Account, AccountType};

use super::required;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub customer_id: Option<String>,
    pub account_type: Option<String>,
    pub branch_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub message: String,
    pub account_id: Uuid,
}

pub async fn create_account(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(req): ApiJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<CreateAccountResponse>), ApiError> {
    caller.require_admin()?;
    let customer_id = parse_id("customer_id", &required(req.customer_id, "customer_id")?)?;
    let account_type = AccountType::from_str(&required(req.account_type, "account_type")?)?;
    let branch_id = parse_id("branch_id", &required(req.branch_id, "branch_id")?)?;

    let account = state
        .run("create_account", move |ctx| {
            ctx.account_service
                .open_account(customer_id, account_type, branch_id)
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            message: "Account created successfully".to_string(),
            account_id: account.id,
        }),
    ))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Account>>, ApiError> {
    caller.require_admin()?;
    let accounts = state
        .run("list_accounts", |ctx| ctx.account_service.list_accounts())
        .await?;
    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(raw_id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    caller.require_admin()?;
    let id = parse_id("account_id", &raw_id)?;
    let account = state
        .run("get_account", move |ctx| ctx.ledger.get_account(id))
        .await?;
    Ok(Json(account))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    caller.require_admin()?;
    let id = parse_id("account_id", &raw_id)?;
    state
        .run("delete_account", move |ctx| ctx.ledger.delete_account(id, &caller))
        .await?;
    Ok(Json(MessageResponse {
        message: "Account deleted successfully".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdjustBalanceRequest {
    /// Signed change to apply
    pub amount: Option<Decimal>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdjustBalanceResponse {
    pub message: String,
    pub new_balance: Decimal,
}

pub async fn adjust_balance(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(raw_id): Path<String>,
    ApiJson(req): ApiJson<AdjustBalanceRequest>,
) -> Result<Json<AdjustBalanceResponse>, ApiError> {
    caller.require_admin()?;
    let id = parse_id("account_id", &raw_id)?;
    let delta = required(req.amount, "amount")?;

    let entry = state
        .run("adjust_balance", move |ctx| {
            ctx.ledger.adjust_balance(id, delta, &caller, req.reason)
        })
        .await?;

    Ok(Json(AdjustBalanceResponse {
        message: "Balance updated successfully".to_string(),
        new_balance: entry.new_balance,
    }))
}
