//! Per-browser session state
//!
//! A [`SessionManager`] owns the auth session of one browser, publishes the
//! signed-in user's profile, and tells listeners when the session changes.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use tokio::sync::{watch, Mutex, OnceCell, RwLock};
use tracing::{debug, info, instrument, warn};

use evently_common::inspect_access_token;
use evently_core::{
    AuthChangeEvent, AuthIdentity, AuthSession, Caller, DomainError, NewProfile, Profile,
    SessionKey, UserMetadata,
};

use crate::dto::ProfileResponse;
use crate::services::{ServiceContext, ServiceResult};

use super::in_flight::{ActionGuard, InFlight};
use super::route::Route;
use super::subscription::{Listeners, SessionNotice, Subscription};

/// Lifetime assumed for a recovery token whose expiry cannot be read
const FALLBACK_TOKEN_LIFETIME: i64 = 3600;

/// Published session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<Profile>,
    /// True until the persisted session has been restored
    pub loading: bool,
}

impl SessionSnapshot {
    fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Session state of one browser
pub struct SessionManager {
    ctx: ServiceContext,
    key: SessionKey,
    session: RwLock<Option<AuthSession>>,
    snapshot: watch::Sender<SessionSnapshot>,
    ready: OnceCell<()>,
    /// Bumped by every applied session change
    generation: Mutex<u64>,
    refresh_lock: Mutex<()>,
    listeners: Listeners,
    in_flight: InFlight,
    last_seen: AtomicI64,
}

impl SessionManager {
    pub fn new(ctx: ServiceContext, key: SessionKey) -> Self {
        let (snapshot, _) = watch::channel(SessionSnapshot::loading());
        Self {
            ctx,
            key,
            session: RwLock::new(None),
            snapshot,
            ready: OnceCell::new(),
            generation: Mutex::new(0),
            refresh_lock: Mutex::new(()),
            listeners: Listeners::default(),
            in_flight: InFlight::default(),
            last_seen: AtomicI64::new(Utc::now().timestamp()),
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    // ========================================================================
    // Bootstrap
    // ========================================================================

    /// Restore the persisted session, once
    ///
    /// Concurrent callers wait for the first restore to finish; later calls
    /// return immediately.
    pub async fn bootstrap(&self) {
        self.ready.get_or_init(|| self.restore()).await;
    }

    /// Snapshot once bootstrap has finished
    pub async fn wait_ready(&self) -> SessionSnapshot {
        self.bootstrap().await;
        self.snapshot()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    #[instrument(skip(self), fields(session = %self.key))]
    async fn restore(&self) {
        let stored = match self.ctx.session_store().load(&self.key).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted session");
                None
            }
        };

        let session = match stored {
            Some(session) if session.expires_within(self.refresh_margin()) => {
                match self
                    .ctx
                    .auth_provider()
                    .refresh_session(&session.refresh_token)
                    .await
                {
                    Ok(fresh) => {
                        info!(user_id = %fresh.user_id(), "Refreshed persisted session");
                        self.persist(&fresh).await;
                        Some(fresh)
                    }
                    Err(e) => {
                        info!(error = %e, "Discarding persisted session");
                        self.forget().await;
                        None
                    }
                }
            }
            other => other,
        };

        let user = match &session {
            Some(session) => self.resolve_profile(session).await,
            None => None,
        };

        debug!(signed_in = session.is_some(), "Session restored");
        *self.session.write().await = session;
        self.snapshot.send_replace(SessionSnapshot {
            user,
            loading: false,
        });
    }

    // ========================================================================
    // Session changes
    // ========================================================================

    /// Apply a provider session change and tell every listener
    ///
    /// Applying the same session twice publishes the same state.
    #[instrument(skip(self, session), fields(session = %self.key))]
    pub async fn on_session_change(&self, event: AuthChangeEvent, session: Option<AuthSession>) {
        self.bootstrap().await;
        self.apply(event, session, None).await;
    }

    /// Apply a session change as the next generation
    ///
    /// With `expected` set, the change is dropped when another change has
    /// been applied since that generation was read.
    async fn apply(
        &self,
        event: AuthChangeEvent,
        session: Option<AuthSession>,
        expected: Option<u64>,
    ) -> bool {
        let mut generation = self.generation.lock().await;
        if expected.is_some_and(|g| g != *generation) {
            debug!(?event, "Dropping stale session change");
            return false;
        }
        *generation += 1;

        let user = match &session {
            Some(session) => {
                self.persist(session).await;
                self.resolve_profile(session).await
            }
            None => {
                self.forget().await;
                None
            }
        };

        *self.session.write().await = session;
        self.publish(event, user);
        true
    }

    /// Current session and the generation it belongs to
    async fn current(&self) -> (Option<AuthSession>, u64) {
        let generation = self.generation.lock().await;
        let session = self.session.read().await.clone();
        (session, *generation)
    }

    /// Republish after the signed-in user's profile changed
    pub async fn profile_updated(&self, profile: Profile) {
        let current = self.session.read().await.as_ref().map(AuthSession::user_id);
        if current == Some(profile.id) {
            self.publish(AuthChangeEvent::UserUpdated, Some(profile));
        }
    }

    fn publish(&self, event: AuthChangeEvent, user: Option<Profile>) {
        let notice = SessionNotice {
            event,
            user: user.as_ref().map(ProfileResponse::from),
            refresh: true,
        };
        self.snapshot.send_replace(SessionSnapshot {
            user,
            loading: false,
        });
        self.listeners.notify(&notice);
        debug!(?event, listeners = self.listeners.len(), "Session change published");
    }

    /// Fetch the profile behind a session, creating it when missing
    async fn resolve_profile(&self, session: &AuthSession) -> Option<Profile> {
        let caller = session.caller();
        match self
            .ctx
            .profile_repo()
            .find_by_id(&caller, session.user_id())
            .await
        {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => self.repair_profile(&caller, &session.user).await,
            Err(e) => {
                warn!(user_id = %session.user_id(), error = %e, "Failed to fetch profile");
                // Keep showing the same user rather than flashing signed-out
                self.snapshot
                    .borrow()
                    .user
                    .clone()
                    .filter(|p| p.id == session.user_id())
            }
        }
    }

    async fn repair_profile(&self, caller: &Caller, identity: &AuthIdentity) -> Option<Profile> {
        let profile = NewProfile {
            id: identity.id,
            first_name: identity.user_metadata.first_name.clone().unwrap_or_default(),
            last_name: identity.user_metadata.last_name.clone().unwrap_or_default(),
            email: identity.email.clone(),
        };

        match self.ctx.profile_repo().create(caller, &profile).await {
            Ok(created) => {
                info!(user_id = %created.id, "Created missing profile");
                Some(created)
            }
            Err(DomainError::DuplicateRecord(_)) => self
                .ctx
                .profile_repo()
                .find_by_id(caller, identity.id)
                .await
                .ok()
                .flatten(),
            Err(e) => {
                warn!(user_id = %identity.id, error = %e, "Failed to create missing profile");
                None
            }
        }
    }

    async fn persist(&self, session: &AuthSession) {
        if let Err(e) = self.ctx.session_store().save(&self.key, session).await {
            warn!(error = %e, "Failed to persist session");
        }
    }

    async fn forget(&self) {
        if let Err(e) = self.ctx.session_store().clear(&self.key).await {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    // ========================================================================
    // Auth actions
    // ========================================================================

    #[instrument(skip(self, password), fields(session = %self.key))]
    pub async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<Route> {
        self.bootstrap().await;

        let session = self
            .ctx
            .auth_provider()
            .sign_in_with_password(email, password)
            .await
            .inspect_err(|e| warn!(error = %e, "Sign in failed"))?;

        info!(user_id = %session.user_id(), "User signed in");
        self.on_session_change(AuthChangeEvent::SignedIn, Some(session))
            .await;
        Ok(Route::Dashboard)
    }

    /// Create an account and its profile
    ///
    /// Returns `Route::Login` when the provider holds the session back until
    /// the email address is confirmed; the profile is then created on first
    /// sign-in.
    #[instrument(skip(self, password), fields(session = %self.key))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> ServiceResult<Route> {
        self.bootstrap().await;

        let metadata = UserMetadata::new(first_name, last_name);
        let outcome = self
            .ctx
            .auth_provider()
            .sign_up(email, password, &metadata)
            .await
            .inspect_err(|e| warn!(error = %e, "Sign up failed"))?;

        let Some(session) = outcome.session else {
            info!(user_id = %outcome.identity.id, "Sign up awaiting email confirmation");
            return Ok(Route::Login);
        };

        let profile = NewProfile {
            id: outcome.identity.id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        };
        let created = self
            .ctx
            .profile_repo()
            .create(&session.caller(), &profile)
            .await;

        info!(user_id = %session.user_id(), "User signed up");
        self.on_session_change(AuthChangeEvent::SignedIn, Some(session))
            .await;

        created.inspect_err(|e| warn!(error = %e, "Failed to create profile at sign up"))?;
        Ok(Route::Dashboard)
    }

    /// End the session; local state is cleared even if the provider fails
    #[instrument(skip(self), fields(session = %self.key))]
    pub async fn sign_out(&self) -> ServiceResult<Route> {
        self.bootstrap().await;

        let current = self.session.read().await.clone();
        if let Some(session) = current {
            if let Err(e) = self
                .ctx
                .auth_provider()
                .sign_out(&session.access_token)
                .await
            {
                warn!(error = %e, "Provider sign out failed");
            }
            info!(user_id = %session.user_id(), "User signed out");
        }

        self.on_session_change(AuthChangeEvent::SignedOut, None)
            .await;
        Ok(Route::Landing)
    }

    #[instrument(skip(self), fields(session = %self.key))]
    pub async fn request_password_reset(&self, email: &str) -> ServiceResult<()> {
        let redirect_to = self.ctx.settings().site_link(&Route::ResetPassword.path());
        self.ctx
            .auth_provider()
            .reset_password_for_email(email, &redirect_to)
            .await?;

        info!("Password reset requested");
        Ok(())
    }

    /// Adopt the session carried by a password recovery link
    #[instrument(skip_all, fields(session = %self.key))]
    pub async fn recover_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> ServiceResult<()> {
        self.bootstrap().await;

        let identity = self.ctx.auth_provider().get_user(access_token).await?;
        let now = Utc::now().timestamp();
        let expires_at = inspect_access_token(access_token)
            .map(|claims| claims.exp)
            .unwrap_or(now + FALLBACK_TOKEN_LIFETIME);

        let session = AuthSession {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            token_type: "bearer".to_string(),
            expires_in: (expires_at - now).max(0),
            expires_at,
            user: identity,
        };

        info!(user_id = %session.user_id(), "Recovery session adopted");
        self.on_session_change(AuthChangeEvent::PasswordRecovery, Some(session))
            .await;
        Ok(())
    }

    /// Set a new password for the signed-in user
    #[instrument(skip_all, fields(session = %self.key))]
    pub async fn reset_password(&self, new_password: &str) -> ServiceResult<Route> {
        self.ensure_fresh().await;

        let (session, generation) = self.current().await;
        let session = session.ok_or(DomainError::NotAuthenticated)?;

        let identity = self
            .ctx
            .auth_provider()
            .update_password(&session.access_token, new_password)
            .await?;

        info!(user_id = %identity.id, "Password updated");
        let updated = AuthSession {
            user: identity,
            ..session
        };
        self.apply(AuthChangeEvent::UserUpdated, Some(updated), Some(generation))
            .await;
        Ok(Route::Login)
    }

    // ========================================================================
    // Token refresh
    // ========================================================================

    /// Exchange the refresh token for a new session
    #[instrument(skip(self), fields(session = %self.key))]
    pub async fn refresh_session(&self) -> ServiceResult<()> {
        self.bootstrap().await;

        let _lock = self.refresh_lock.lock().await;
        let (current, generation) = self.current().await;
        let current = current.ok_or(DomainError::NotAuthenticated)?;
        self.exchange(current, generation).await
    }

    /// Caller for the current request, refreshing a token about to expire
    ///
    /// A failed refresh leaves the browser signed out.
    pub async fn ensure_fresh(&self) -> Caller {
        self.bootstrap().await;
        self.touch();

        let margin = self.refresh_margin();
        let stale = self
            .session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.expires_within(margin));

        if stale {
            let _lock = self.refresh_lock.lock().await;
            // Another request may have refreshed while this one waited
            let (current, generation) = self.current().await;
            if let Some(current) = current.filter(|s| s.expires_within(margin)) {
                if let Err(e) = self.exchange(current, generation).await {
                    debug!(error = %e, "Token refresh failed");
                }
            }
        }

        self.caller().await
    }

    /// Refresh `current`, applying the result only if no other session
    /// change landed while the provider call was in flight
    async fn exchange(&self, current: AuthSession, generation: u64) -> ServiceResult<()> {
        match self
            .ctx
            .auth_provider()
            .refresh_session(&current.refresh_token)
            .await
        {
            Ok(fresh) => {
                let user_id = fresh.user_id();
                if self
                    .apply(AuthChangeEvent::TokenRefreshed, Some(fresh), Some(generation))
                    .await
                {
                    info!(%user_id, "Session refreshed");
                    Ok(())
                } else if self.session.read().await.is_none() {
                    Err(DomainError::NotAuthenticated.into())
                } else {
                    Ok(())
                }
            }
            Err(e) => {
                warn!(user_id = %current.user_id(), error = %e, "Session refresh failed");
                if e.is_authentication() {
                    self.apply(AuthChangeEvent::SignedOut, None, Some(generation))
                        .await;
                }
                Err(e.into())
            }
        }
    }

    fn refresh_margin(&self) -> i64 {
        self.ctx.settings().refresh_margin_seconds
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Identity used to scope gateway calls
    pub async fn caller(&self) -> Caller {
        self.session
            .read()
            .await
            .as_ref()
            .map_or(Caller::Anonymous, AuthSession::caller)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn current_user(&self) -> Option<Profile> {
        self.snapshot.borrow().user.clone()
    }

    /// Receiver that observes every published snapshot
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// Register a listener for session changes
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionNotice) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Claim a mutating action for this browser session
    pub fn begin(&self, action: impl Into<String>) -> ServiceResult<ActionGuard> {
        self.in_flight.begin(action.into())
    }

    // ========================================================================
    // Idle tracking
    // ========================================================================

    pub fn touch(&self) {
        self.last_seen.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    pub fn last_seen(&self) -> i64 {
        self.last_seen.load(Ordering::Relaxed)
    }

    pub fn is_idle(&self, now: i64, idle_timeout_seconds: i64) -> bool {
        now.saturating_sub(self.last_seen()) >= idle_timeout_seconds
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("key", &self.key)
            .field("ready", &self.is_ready())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
