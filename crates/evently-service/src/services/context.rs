//! Service context - dependency container for services
//!
//! Holds the gateway ports, the session store, and the settings shared by
//! every browser session.

use std::sync::Arc;

use evently_common::AppConfig;
use evently_core::traits::{
    AttendeeRepository, AuthProvider, EventRepository, ProfileRepository, SessionStore,
};

use super::error::{ServiceError, ServiceResult};

/// Settings the service layer reads from application config
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Public origin used to build links sent by email or shared by users
    pub site_url: String,
    /// Refresh access tokens expiring within this many seconds
    pub refresh_margin_seconds: i64,
    /// Forget in-process session state after this much inactivity
    pub idle_timeout_seconds: u64,
}

impl ServiceSettings {
    /// Absolute link to a path on the public site
    pub fn site_link(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            refresh_margin_seconds: 60,
            idle_timeout_seconds: 3600,
        }
    }
}

impl From<&AppConfig> for ServiceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            site_url: config.app.site_url.clone(),
            refresh_margin_seconds: config.session.refresh_margin_seconds,
            idle_timeout_seconds: config.session.idle_timeout_seconds,
        }
    }
}

/// Service context containing all dependencies
///
/// Cloning is cheap; every port sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Gateway ports
    event_repo: Arc<dyn EventRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    attendee_repo: Arc<dyn AttendeeRepository>,
    auth_provider: Arc<dyn AuthProvider>,

    // Session persistence
    session_store: Arc<dyn SessionStore>,

    settings: ServiceSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        attendee_repo: Arc<dyn AttendeeRepository>,
        auth_provider: Arc<dyn AuthProvider>,
        session_store: Arc<dyn SessionStore>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            event_repo,
            profile_repo,
            attendee_repo,
            auth_provider,
            session_store,
            settings,
        }
    }

    /// Wire every gateway port to a single backend implementation
    pub fn from_backend<B>(
        backend: Arc<B>,
        session_store: Arc<dyn SessionStore>,
        settings: ServiceSettings,
    ) -> Self
    where
        B: EventRepository + ProfileRepository + AttendeeRepository + AuthProvider + 'static,
    {
        Self::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend,
            session_store,
            settings,
        )
    }

    // === Gateway Ports ===

    /// Get the event repository
    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    /// Get the profile repository
    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    /// Get the attendee repository
    pub fn attendee_repo(&self) -> &dyn AttendeeRepository {
        self.attendee_repo.as_ref()
    }

    /// Get the auth provider
    pub fn auth_provider(&self) -> &dyn AuthProvider {
        self.auth_provider.as_ref()
    }

    // === Session Store ===

    /// Get the persisted session store
    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    // === Settings ===

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("auth_provider", &"...")
            .field("session_store", &"...")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    event_repo: Option<Arc<dyn EventRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    attendee_repo: Option<Arc<dyn AttendeeRepository>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    session_store: Option<Arc<dyn SessionStore>>,
    settings: Option<ServiceSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn attendee_repo(mut self, repo: Arc<dyn AttendeeRepository>) -> Self {
        self.attendee_repo = Some(repo);
        self
    }

    pub fn auth_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth_provider = Some(provider);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.event_repo
                .ok_or_else(|| ServiceError::validation("event_repo is required"))?,
            self.profile_repo
                .ok_or_else(|| ServiceError::validation("profile_repo is required"))?,
            self.attendee_repo
                .ok_or_else(|| ServiceError::validation("attendee_repo is required"))?,
            self.auth_provider
                .ok_or_else(|| ServiceError::validation("auth_provider is required"))?,
            self.session_store
                .ok_or_else(|| ServiceError::validation("session_store is required"))?,
            self.settings.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_link_joins_cleanly() {
        let settings = ServiceSettings {
            site_url: "https://evently.example.com/".to_string(),
            ..ServiceSettings::default()
        };
        assert_eq!(
            settings.site_link("/reset-password"),
            "https://evently.example.com/reset-password"
        );
    }

    #[test]
    fn test_builder_requires_ports() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("event_repo is required"));
    }
}
