//! Process-local session storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use evently_core::{AuthSession, RepoResult, SessionKey, SessionStore};

use super::SessionRecord;

/// In-memory session store; sessions do not survive a restart
#[derive(Clone, Debug)]
pub struct MemorySessionStore {
    records: Arc<DashMap<String, SessionRecord>>,
    ttl_seconds: i64,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Number of stored sessions, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn is_live(&self, record: &SessionRecord, now: i64) -> bool {
        now.saturating_sub(record.saved_at) < self.ttl_seconds
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &SessionKey) -> RepoResult<Option<AuthSession>> {
        let now = Utc::now().timestamp();
        let Some(mut record) = self.records.get_mut(key.as_str()) else {
            return Ok(None);
        };

        if !self.is_live(&record, now) {
            drop(record);
            self.records.remove(key.as_str());
            return Ok(None);
        }

        record.saved_at = now;
        Ok(Some(record.session.clone()))
    }

    async fn save(&self, key: &SessionKey, session: &AuthSession) -> RepoResult<()> {
        self.records
            .insert(key.as_str().to_string(), SessionRecord::new(session.clone()));
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> RepoResult<()> {
        self.records.remove(key.as_str());
        Ok(())
    }
}
