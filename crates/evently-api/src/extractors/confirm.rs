//! Confirmation extractor for destructive actions
//!
//! The browser shows a confirmation dialog before deleting or leaving an
//! event; the request only goes through with `?confirm=true`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Default, Deserialize)]
struct ConfirmParams {
    #[serde(default)]
    confirm: bool,
}

/// Proof that the user confirmed the action
#[derive(Debug, Clone, Copy)]
pub struct Confirmed;

#[async_trait]
impl<S> FromRequestParts<S> for Confirmed
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ConfirmParams>::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        if params.confirm {
            Ok(Confirmed)
        } else {
            Err(ApiError::ConfirmationRequired)
        }
    }
}
