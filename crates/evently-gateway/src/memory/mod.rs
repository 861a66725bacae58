//! In-process backend
//!
//! Implements every data and auth port against in-memory tables, enforcing
//! the same row-level policies as the hosted schema:
//!
//! - anonymous callers read nothing and write nothing
//! - events are created for, updated by, and deleted by their organizer only
//! - profiles are created and updated by their owner only
//! - users join and leave events as themselves only
//! - `(event_id, user_id)` is unique; deleting an event removes its attendees
//!
//! Access tokens are real HS256 JWTs minted per backend instance, so expired
//! or revoked tokens are rejected the way the hosted service rejects them.

mod auth;
mod data;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use uuid::Uuid;

use evently_common::{AppError, JwtService};
use evently_core::{AuthIdentity, Caller, DomainError, Event, EventAttendee, Profile, RepoResult};

/// Tunables for the in-process backend
#[derive(Debug, Clone)]
pub struct MemoryOptions {
    /// Access-token lifetime in seconds
    pub access_token_ttl: i64,
    /// When set, sign-up returns no session until the email is confirmed
    pub require_email_confirmation: bool,
    /// Minimum password length accepted at sign-up
    pub min_password_length: usize,
}

impl Default for MemoryOptions {
    fn default() -> Self {
        Self {
            access_token_ttl: 3600,
            require_email_confirmation: false,
            min_password_length: 6,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    events: HashMap<Uuid, Event>,
    attendees: Vec<EventAttendee>,
}

#[derive(Debug)]
struct Account {
    identity: AuthIdentity,
    password: String,
    confirmed: bool,
}

#[derive(Debug, Default)]
struct Accounts {
    /// Keyed by lowercased email
    by_email: HashMap<String, Account>,
    /// Refresh token -> (user id, auth session id)
    refresh_tokens: HashMap<String, (Uuid, String)>,
    revoked_sessions: HashSet<String>,
    recovery_emails: Vec<(String, String)>,
}

/// In-process implementation of all gateway ports
pub struct MemoryBackend {
    options: MemoryOptions,
    jwt: JwtService,
    tables: RwLock<Tables>,
    accounts: RwLock<Accounts>,
    fail_next_profile_insert: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_options(MemoryOptions::default())
    }

    pub fn with_options(options: MemoryOptions) -> Self {
        let secret = format!("{}{}", Uuid::new_v4(), Uuid::new_v4());
        Self {
            jwt: JwtService::new(&secret, options.access_token_ttl),
            options,
            tables: RwLock::new(Tables::default()),
            accounts: RwLock::new(Accounts::default()),
            fail_next_profile_insert: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // Test hooks
    // ========================================================================

    /// Make the next profile insert fail with a backend error
    pub fn fail_next_profile_insert(&self) {
        self.fail_next_profile_insert.store(true, Ordering::SeqCst);
    }

    /// Mark an account's email as confirmed
    pub async fn confirm_email(&self, email: &str) -> bool {
        let mut accounts = self.accounts.write().await;
        match accounts.by_email.get_mut(&email.to_lowercase()) {
            Some(account) => {
                account.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Password recovery emails sent so far, as `(email, redirect_to)`
    pub async fn recovery_emails(&self) -> Vec<(String, String)> {
        self.accounts.read().await.recovery_emails.clone()
    }

    /// Number of attendee rows for a pair, bypassing policies
    pub async fn attendee_rows(&self, event_id: Uuid, user_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .attendees
            .iter()
            .filter(|a| a.links(event_id, user_id))
            .count()
    }

    /// Total number of attendee rows, bypassing policies
    pub async fn total_attendee_rows(&self) -> usize {
        self.tables.read().await.attendees.len()
    }

    // ========================================================================
    // Policy helpers
    // ========================================================================

    /// Verify the caller's token and return the authenticated user, if any
    async fn authenticate(&self, caller: &Caller) -> RepoResult<Option<Uuid>> {
        let Caller::User { id, access_token } = caller else {
            return Ok(None);
        };

        let claims = self.jwt.verify(access_token).map_err(|e| match e {
            AppError::SessionExpired => DomainError::SessionExpired,
            _ => DomainError::PolicyViolation("invalid access token".to_string()),
        })?;

        if claims.sub != *id {
            return Err(DomainError::PolicyViolation(
                "access token does not belong to caller".to_string(),
            ));
        }
        if let Some(session_id) = &claims.session_id {
            if self.accounts.read().await.revoked_sessions.contains(session_id) {
                return Err(DomainError::SessionExpired);
            }
        }
        Ok(Some(claims.sub))
    }

    /// Like `authenticate`, but anonymous callers are rejected
    async fn require_user(&self, caller: &Caller, action: &str) -> RepoResult<Uuid> {
        self.authenticate(caller)
            .await?
            .ok_or_else(|| DomainError::PolicyViolation(format!("anonymous {action}")))
    }

    fn take_profile_insert_failure(&self) -> bool {
        self.fail_next_profile_insert.swap(false, Ordering::SeqCst)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
