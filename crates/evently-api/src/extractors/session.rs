//! Browser session extractors
//!
//! The session cookie middleware puts a [`SessionKey`] into the request
//! extensions; these extractors resolve it to the browser's
//! [`SessionManager`] and the caller identity for this request.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use evently_core::{Caller, SessionKey};
use evently_service::SessionManager;
use uuid::Uuid;

use crate::response::ApiError;
use crate::state::AppState;

/// Session of the requesting browser, signed in or not
#[derive(Clone)]
pub struct CurrentSession {
    pub manager: Arc<SessionManager>,
    /// Identity for data requests, refreshed if the token was about to expire
    pub caller: Caller,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .extensions
            .get::<SessionKey>()
            .cloned()
            .ok_or_else(|| ApiError::internal(anyhow::anyhow!("session cookie layer missing")))?;

        let app_state = AppState::from_ref(state);
        let manager = app_state.sessions().resolve(&key).await;
        let caller = manager.ensure_fresh().await;

        Ok(Self { manager, caller })
    }
}

impl std::fmt::Debug for CurrentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentSession")
            .field("session", self.manager.key())
            .field("caller", &self.caller)
            .finish()
    }
}

/// Session of a signed-in browser
///
/// Rejects with `401` and a redirect to the login page otherwise, like the
/// dashboard layout does for every page under it.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub manager: Arc<SessionManager>,
    pub caller: Caller,
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession { manager, caller } =
            CurrentSession::from_request_parts(parts, state).await?;

        let user_id = caller.user_id().ok_or(ApiError::MissingAuth)?;

        Ok(Self {
            manager,
            caller,
            user_id,
        })
    }
}
