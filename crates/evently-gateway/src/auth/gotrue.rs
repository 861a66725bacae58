//! GoTrue implementation of AuthProvider

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{info, instrument};

use evently_common::inspect_access_token;
use evently_core::{
    AuthIdentity, AuthProvider, AuthSession, RepoResult, SignUpOutcome, UserMetadata,
};

use crate::client::RestClient;
use crate::models::{SessionModel, SignUpResponse, UserModel};

/// Auth provider backed by the hosted GoTrue API
#[derive(Clone)]
pub struct GoTrueClient {
    client: Arc<RestClient>,
}

impl GoTrueClient {
    /// Create a new GoTrueClient
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

impl From<UserModel> for AuthIdentity {
    fn from(user: UserModel) -> Self {
        AuthIdentity {
            id: user.id,
            email: user.email.unwrap_or_default(),
            user_metadata: user.user_metadata,
        }
    }
}

impl From<SessionModel> for AuthSession {
    fn from(model: SessionModel) -> Self {
        let expires_at = model.expires_at.unwrap_or_else(|| {
            inspect_access_token(&model.access_token)
                .map(|claims| claims.exp)
                .unwrap_or_else(|_| Utc::now().timestamp() + model.expires_in)
        });

        AuthSession {
            access_token: model.access_token,
            refresh_token: model.refresh_token,
            token_type: model.token_type,
            expires_in: model.expires_in,
            expires_at,
            user: model.user.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for GoTrueClient {
    #[instrument(skip(self, password, metadata))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> RepoResult<SignUpOutcome> {
        let request = self
            .client
            .auth_request(Method::POST, "signup", None)
            .json(&json!({ "email": email, "password": password, "data": metadata }));

        let outcome = match self.client.execute_auth::<SignUpResponse>(request).await? {
            SignUpResponse::Session(model) => {
                let session = AuthSession::from(model);
                SignUpOutcome {
                    identity: session.user.clone(),
                    session: Some(session),
                }
            }
            SignUpResponse::User(user) => SignUpOutcome {
                identity: user.into(),
                session: None,
            },
        };

        info!(
            user_id = %outcome.identity.id,
            confirmed = outcome.session.is_some(),
            "Auth identity created"
        );
        Ok(outcome)
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(&self, email: &str, password: &str) -> RepoResult<AuthSession> {
        let request = self
            .client
            .auth_request(Method::POST, "token", None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let model: SessionModel = self.client.execute_auth(request).await?;
        Ok(model.into())
    }

    #[instrument(skip_all)]
    async fn refresh_session(&self, refresh_token: &str) -> RepoResult<AuthSession> {
        let request = self
            .client
            .auth_request(Method::POST, "token", None)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));

        let model: SessionModel = self.client.execute_auth(request).await?;
        Ok(model.into())
    }

    #[instrument(skip_all)]
    async fn get_user(&self, access_token: &str) -> RepoResult<AuthIdentity> {
        let request = self
            .client
            .auth_request(Method::GET, "user", Some(access_token));

        let user: UserModel = self.client.execute_auth(request).await?;
        Ok(user.into())
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> RepoResult<()> {
        let request = self
            .client
            .auth_request(Method::POST, "logout", Some(access_token));
        self.client.execute_auth_empty(request).await
    }

    #[instrument(skip(self))]
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> RepoResult<()> {
        let request = self
            .client
            .auth_request(Method::POST, "recover", None)
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }));
        self.client.execute_auth_empty(request).await
    }

    #[instrument(skip_all)]
    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> RepoResult<AuthIdentity> {
        let request = self
            .client
            .auth_request(Method::PUT, "user", Some(access_token))
            .json(&json!({ "password": new_password }));

        let user: UserModel = self.client.execute_auth(request).await?;
        Ok(user.into())
    }
}
