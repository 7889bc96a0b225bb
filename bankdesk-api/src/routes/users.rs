//! Login identities, caller introspection and liveness

use std::collections::BTreeSet;
use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bankdesk_core::domain::amount::parse_id;
use bankdesk_core::{Error, Role, User};

use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Register a user; the role defaults to USER
///
/// Unbound USER sign-ups need no credentials. An ADMIN role or a customer
/// binding requires an administrator's credentials.
pub async fn create_user(
    State(state): State<AppState>,
    registrar: Option<Authenticated>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(Error::validation("Username and password are required").into());
    };
    let role = match req.role {
        Some(raw) => Role::from_str(&raw)?,
        None => Role::User,
    };
    let customer_id = req
        .customer_id
        .map(|raw| parse_id("customer_id", &raw))
        .transpose()?;

    let user = state
        .run("create_user", move |ctx| {
            let registrar = registrar.map(|Authenticated(caller)| caller);
            ctx.user_service
                .register(&username, &password, role, customer_id, registrar.as_ref())
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

pub async fn list_users(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<User>>, ApiError> {
    caller.require_admin()?;
    let users = state
        .run("list_users", |ctx| ctx.user_service.list_users())
        .await?;
    Ok(Json(users))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub message: String,
    pub user_id: Uuid,
    pub role: Role,
    pub customer_id: Option<Uuid>,
    pub accounts: BTreeSet<Uuid>,
}

pub async fn whoami(Authenticated(caller): Authenticated) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        message: format!("Hello, {}!", caller.role),
        user_id: caller.user_id,
        role: caller.role,
        customer_id: caller.customer_id,
        accounts: caller.owned_accounts.into_iter().collect(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
