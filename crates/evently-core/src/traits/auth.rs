//! Auth provider and session persistence ports

use async_trait::async_trait;

use crate::entities::{AuthIdentity, AuthSession, SignUpOutcome, UserMetadata};
use crate::value_objects::SessionKey;

use super::RepoResult;

/// External email/password auth provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an auth identity carrying the given metadata
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> RepoResult<SignUpOutcome>;

    /// Exchange credentials for a session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> RepoResult<AuthSession>;

    /// Exchange a refresh token for a new session
    async fn refresh_session(&self, refresh_token: &str) -> RepoResult<AuthSession>;

    /// Resolve the identity behind an access token
    async fn get_user(&self, access_token: &str) -> RepoResult<AuthIdentity>;

    /// Terminate the session behind an access token
    async fn sign_out(&self, access_token: &str) -> RepoResult<()>;

    /// Send a password reset email linking back to `redirect_to`
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> RepoResult<()>;

    /// Set a new password for the identity behind an access token
    async fn update_password(&self, access_token: &str, new_password: &str)
        -> RepoResult<AuthIdentity>;
}

/// Persisted browser sessions, keyed by session cookie
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted session for a key
    async fn load(&self, key: &SessionKey) -> RepoResult<Option<AuthSession>>;

    /// Persist (or replace) the session for a key
    async fn save(&self, key: &SessionKey, session: &AuthSession) -> RepoResult<()>;

    /// Forget the session for a key
    async fn clear(&self, key: &SessionKey) -> RepoResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
