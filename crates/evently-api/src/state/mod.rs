//! Application state
//!
//! Holds the session registry (and through it the service context) plus the
//! configuration shared by every handler.

use std::sync::Arc;

use evently_common::AppConfig;
use evently_service::{ServiceContext, SessionRegistry};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// One session manager per browser
    sessions: Arc<SessionRegistry>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(sessions: SessionRegistry, config: AppConfig) -> Self {
        Self {
            sessions: Arc::new(sessions),
            config: Arc::new(config),
        }
    }

    /// Service context shared by every session
    pub fn service_context(&self) -> &ServiceContext {
        self.sessions.context()
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Shared handle to the registry, for background tasks
    pub fn sessions_handle(&self) -> Arc<SessionRegistry> {
        self.sessions.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("config", &"AppConfig")
            .finish()
    }
}
