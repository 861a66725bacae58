//! Browser session storage in Redis.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use evently_core::{AuthSession, DomainError, RepoResult, SessionKey, SessionStore};

use crate::pool::{RedisPool, RedisPoolError};

/// Key prefix for persisted sessions
const SESSION_PREFIX: &str = "evently:session:";

/// Persisted session with bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session: AuthSession,
    /// Unix timestamp of the last save
    pub saved_at: i64,
}

impl SessionRecord {
    #[must_use]
    pub fn new(session: AuthSession) -> Self {
        Self {
            session,
            saved_at: Utc::now().timestamp(),
        }
    }
}

fn store_error(e: RedisPoolError) -> DomainError {
    DomainError::SessionStoreError(e.to_string())
}

/// Redis-backed session store, shared by every server instance
#[derive(Clone, Debug)]
pub struct RedisSessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    /// Generate Redis key for a session
    fn key(key: &SessionKey) -> String {
        format!("{SESSION_PREFIX}{}", key.as_str())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &SessionKey) -> RepoResult<Option<AuthSession>> {
        let record: Option<SessionRecord> = self
            .pool
            .get_value(&Self::key(key))
            .await
            .map_err(store_error)?;

        if record.is_some() {
            // Sliding expiry
            self.pool
                .expire(&Self::key(key), self.ttl_seconds)
                .await
                .map_err(store_error)?;
        }
        Ok(record.map(|r| r.session))
    }

    async fn save(&self, key: &SessionKey, session: &AuthSession) -> RepoResult<()> {
        self.pool
            .set(
                &Self::key(key),
                &SessionRecord::new(session.clone()),
                self.ttl_seconds,
            )
            .await
            .map_err(store_error)?;

        tracing::debug!(session = %key, user_id = %session.user_id(), "Stored session");
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> RepoResult<()> {
        let deleted = self
            .pool
            .delete(&Self::key(key))
            .await
            .map_err(store_error)?;

        if deleted {
            tracing::debug!(session = %key, "Cleared session");
        }
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        self.pool.health_check().await.map_err(store_error)
    }
}
