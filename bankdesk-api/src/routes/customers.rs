//! Customer records

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bankdesk_core::domain::amount::parse_id;
use bankdesk_core::Customer;

use super::required;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCustomerResponse {
    pub message: String,
    pub customer_id: Uuid,
}

pub async fn create_customer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(req): ApiJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CreateCustomerResponse>), ApiError> {
    caller.require_admin()?;
    let first_name = required(req.first_name, "first_name")?;
    let last_name = required(req.last_name, "last_name")?;
    let email = required(req.email, "email")?;

    let customer = state
        .run("create_customer", move |ctx| {
            ctx.customer_service
                .create_customer(&first_name, &last_name, &email)
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCustomerResponse {
            message: "Customer created successfully".to_string(),
            customer_id: customer.id,
        }),
    ))
}

pub async fn list_customers(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Customer>>, ApiError> {
    caller.require_admin()?;
    let customers = state
        .run("list_customers", |ctx| ctx.customer_service.list_customers())
        .await?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(raw_id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    caller.require_admin()?;
    let id = parse_id("customer_id", &raw_id)?;
    let customer = state
        .run("get_customer", move |ctx| ctx.customer_service.get_customer(id))
        .await?;
    Ok(Json(customer))
}
