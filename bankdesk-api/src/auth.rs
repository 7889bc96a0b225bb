//! HTTP Basic authentication

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use bankdesk_core::{Caller, Error};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller of a request
pub struct Authenticated(pub Caller);

/// Extract `(username, password)` from an `Authorization: Basic ...` value
pub fn parse_basic(header_value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn basic_credentials(parts: &Parts) -> Option<Option<(String, String)>> {
    let value = parts.headers.get(AUTHORIZATION)?;
    Some(value.to_str().ok().and_then(parse_basic))
}

async fn authenticate(
    state: &AppState,
    credentials: Option<(String, String)>,
) -> Result<Authenticated, ApiError> {
    let (username, password) = credentials
        .ok_or_else(|| ApiError(Error::unauthorized("Missing or malformed credentials")))?;
    let caller = state
        .run("authenticate", move |ctx| {
            ctx.user_service.authenticate(&username, &password)
        })
        .await?;
    Ok(Authenticated(caller))
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(state, basic_credentials(parts).flatten()).await
    }
}

/// `Option<Authenticated>`: `None` without an `Authorization` header, 401
/// when one is present but does not check out
impl OptionalFromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match basic_credentials(parts) {
            None => Ok(None),
            Some(credentials) => authenticate(state, credentials).await.map(Some),
        }
    }
}
