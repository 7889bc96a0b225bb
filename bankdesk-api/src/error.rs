//! Mapping of ledger errors onto HTTP responses

use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bankdesk_core::Error;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub reason: &'static str,
}

/// A core error on its way out as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::validation(rejection.body_text()))
    }
}

pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Validation(_) | Error::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
        Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::Forbidden(_) => StatusCode::FORBIDDEN,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::PartialFailure(_)
        | Error::Database(_)
        | Error::Config(_)
        | Error::Io(_)
        | Error::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing message; storage details never leave the process
fn public_message(error: &Error) -> String {
    match error {
        Error::Validation(msg)
        | Error::NotFound(msg)
        | Error::Forbidden(msg)
        | Error::Unauthorized(msg)
        | Error::Conflict(msg) => msg.clone(),
        Error::InsufficientFunds { .. } => "Insufficient balance".to_string(),
        Error::PartialFailure(_) => {
            "The operation was partially applied and has been flagged for reconciliation"
                .to_string()
        }
        Error::Database(_) | Error::Config(_) | Error::Io(_) | Error::Json(_) => {
            "An unexpected error occurred".to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody {
            error: public_message(&self.0),
            reason: self.0.reason(),
        };

        if status == StatusCode::UNAUTHORIZED {
            return (
                status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"bankdesk\"")],
                Json(body),
            )
                .into_response();
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&Error::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&Error::InsufficientFunds {
                account_id: Uuid::new_v4(),
                balance: Decimal::ZERO,
                delta: Decimal::NEGATIVE_ONE,
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&Error::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&Error::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&Error::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&Error::partial_failure("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_errors_are_not_echoed() {
        let msg = public_message(&Error::database("duckdb: table sys_accounts is corrupt"));
        assert!(!msg.contains("sys_accounts"));
    }
}
