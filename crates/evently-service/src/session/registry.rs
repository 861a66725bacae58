//! Session managers keyed by browser session

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info};

use evently_core::SessionKey;

use crate::services::ServiceContext;

use super::manager::SessionManager;

/// Owns one [`SessionManager`] per browser session
#[derive(Debug)]
pub struct SessionRegistry {
    ctx: ServiceContext,
    managers: DashMap<SessionKey, Arc<SessionManager>>,
}

impl SessionRegistry {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            managers: DashMap::new(),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Manager for `key`, created and bootstrapped on first use
    pub async fn resolve(&self, key: &SessionKey) -> Arc<SessionManager> {
        let manager = self
            .managers
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(session = %key, "Creating session manager");
                Arc::new(SessionManager::new(self.ctx.clone(), key.clone()))
            })
            .clone();

        manager.touch();
        manager.bootstrap().await;
        manager
    }

    pub fn get(&self, key: &SessionKey) -> Option<Arc<SessionManager>> {
        self.managers.get(key).map(|m| m.clone())
    }

    /// Drop managers idle for longer than the configured timeout
    ///
    /// Managers still referenced elsewhere (an open stream, a running
    /// request) are kept. Persisted sessions are untouched, so a pruned
    /// browser is restored on its next request.
    pub fn prune_idle(&self) -> usize {
        let now = Utc::now().timestamp();
        let timeout = i64::try_from(self.ctx.settings().idle_timeout_seconds).unwrap_or(i64::MAX);

        let before = self.managers.len();
        self.managers
            .retain(|_, manager| Arc::strong_count(manager) > 1 || !manager.is_idle(now, timeout));
        let pruned = before.saturating_sub(self.managers.len());

        if pruned > 0 {
            info!(pruned, remaining = self.managers.len(), "Pruned idle sessions");
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}
