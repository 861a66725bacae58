//! Auth provider port over in-memory accounts

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use evently_common::AppError;
use evently_core::{
    AuthIdentity, AuthProvider, AuthSession, DomainError, RepoResult, SignUpOutcome,
    UserMetadata,
};

use super::{Account, Accounts, MemoryBackend};

impl MemoryBackend {
    /// Mint a session for an identity and remember its refresh token
    fn issue_session(
        &self,
        accounts: &mut Accounts,
        identity: &AuthIdentity,
        session_id: String,
    ) -> RepoResult<AuthSession> {
        let (access_token, expires_at) = self
            .jwt
            .issue(identity.id, &identity.email, Some(session_id.clone()))
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let refresh_token = Uuid::new_v4().simple().to_string();
        accounts
            .refresh_tokens
            .insert(refresh_token.clone(), (identity.id, session_id));

        Ok(AuthSession {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: self.jwt.access_token_expiry(),
            expires_at,
            user: identity.clone(),
        })
    }

    /// Resolve the account behind an access token
    fn account_for_token<'a>(
        &self,
        accounts: &'a mut Accounts,
        access_token: &str,
    ) -> RepoResult<&'a mut Account> {
        let claims = self.jwt.verify(access_token).map_err(|e| match e {
            AppError::SessionExpired => DomainError::SessionExpired,
            _ => DomainError::NotAuthenticated,
        })?;
        if claims
            .session_id
            .as_ref()
            .is_some_and(|sid| accounts.revoked_sessions.contains(sid))
        {
            return Err(DomainError::SessionExpired);
        }

        accounts
            .by_email
            .values_mut()
            .find(|a| a.identity.id == claims.sub)
            .ok_or(DomainError::NotAuthenticated)
    }

    fn check_password(&self, password: &str) -> RepoResult<()> {
        if password.chars().count() < self.options.min_password_length {
            return Err(DomainError::WeakPassword(format!(
                "Password should be at least {} characters",
                self.options.min_password_length
            )));
        }
        Ok(())
    }
}

fn check_email(email: &str) -> RepoResult<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(email.to_lowercase())
        }
        _ => Err(DomainError::InvalidEmail),
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    #[instrument(skip(self, password, metadata))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> RepoResult<SignUpOutcome> {
        let key = check_email(email)?;
        self.check_password(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.by_email.contains_key(&key) {
            return Err(DomainError::EmailAlreadyRegistered);
        }

        let identity = AuthIdentity {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            user_metadata: metadata.clone(),
        };
        let confirmed = !self.options.require_email_confirmation;
        accounts.by_email.insert(
            key,
            Account {
                identity: identity.clone(),
                password: password.to_string(),
                confirmed,
            },
        );

        let session = if confirmed {
            Some(self.issue_session(&mut accounts, &identity, Uuid::new_v4().to_string())?)
        } else {
            None
        };

        info!(user_id = %identity.id, confirmed, "Auth identity created");
        Ok(SignUpOutcome { identity, session })
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(&self, email: &str, password: &str) -> RepoResult<AuthSession> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .by_email
            .get(&email.trim().to_lowercase())
            .filter(|a| a.password == password)
            .ok_or(DomainError::InvalidCredentials)?;

        if !account.confirmed {
            return Err(DomainError::EmailNotConfirmed);
        }

        let identity = account.identity.clone();
        self.issue_session(&mut accounts, &identity, Uuid::new_v4().to_string())
    }

    #[instrument(skip_all)]
    async fn refresh_session(&self, refresh_token: &str) -> RepoResult<AuthSession> {
        let mut accounts = self.accounts.write().await;
        let (user_id, session_id) = accounts
            .refresh_tokens
            .remove(refresh_token)
            .ok_or(DomainError::SessionExpired)?;

        if accounts.revoked_sessions.contains(&session_id) {
            return Err(DomainError::SessionExpired);
        }

        let identity = accounts
            .by_email
            .values()
            .find(|a| a.identity.id == user_id)
            .map(|a| a.identity.clone())
            .ok_or(DomainError::SessionExpired)?;

        self.issue_session(&mut accounts, &identity, session_id)
    }

    #[instrument(skip_all)]
    async fn get_user(&self, access_token: &str) -> RepoResult<AuthIdentity> {
        let mut accounts = self.accounts.write().await;
        let account = self.account_for_token(&mut accounts, access_token)?;
        Ok(account.identity.clone())
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> RepoResult<()> {
        let claims = self
            .jwt
            .verify(access_token)
            .map_err(|_| DomainError::NotAuthenticated)?;

        if let Some(session_id) = claims.session_id {
            let mut accounts = self.accounts.write().await;
            accounts.refresh_tokens.retain(|_, (_, sid)| *sid != session_id);
            accounts.revoked_sessions.insert(session_id);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> RepoResult<()> {
        let key = check_email(email)?;
        let mut accounts = self.accounts.write().await;

        // Unknown addresses succeed silently so accounts cannot be probed
        if accounts.by_email.contains_key(&key) {
            accounts
                .recovery_emails
                .push((key, redirect_to.to_string()));
        }
        Ok(())
    }

    #[instrument(skip_all)]
    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> RepoResult<AuthIdentity> {
        self.check_password(new_password)?;
        let mut accounts = self.accounts.write().await;
        let account = self.account_for_token(&mut accounts, access_token)?;
        account.password = new_password.to_string();
        Ok(account.identity.clone())
    }
}
