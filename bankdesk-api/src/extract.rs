//! Request extractors that reject with the JSON error body

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections are 400 `{error, reason}` bodies
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
