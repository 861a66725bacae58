//! Application configuration structs
//!
//! Loads configuration from environment variables, with a `.env` file as a
//! fallback source.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub redis: Option<RedisConfig>,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
    /// Public origin of the site, used to build links in emails
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

impl AppSettings {
    /// Absolute URL of a site path
    #[must_use]
    pub fn site_link(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Hosted backend (data + auth) configuration
#[derive(Clone, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public (anon) API key
    pub anon_key: String,
    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u64,
}

impl BackendConfig {
    /// Base URL of the REST data API
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    /// Base URL of the auth API
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish_non_exhaustive()
    }
}

/// Where browser sessions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    #[default]
    Memory,
    Redis,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub store: SessionStoreKind,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub cookie_secure: bool,
    /// Lifetime of a persisted session
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: u64,
    /// Refresh access tokens that expire within this many seconds
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_seconds: i64,
    /// Drop in-process session state after this much inactivity
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: SessionStoreKind::default(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            ttl_seconds: default_session_ttl(),
            refresh_margin_seconds: default_refresh_margin(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "evently".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_backend_timeout() -> u64 {
    10
}

fn default_cookie_name() -> String {
    "evently_session".to_string()
}

fn default_session_ttl() -> u64 {
    604_800 // 7 days
}

fn default_refresh_margin() -> i64 {
    60
}

fn default_idle_timeout() -> u64 {
    3600
}

fn default_redis_max_connections() -> u32 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|s| {
                    s.parse()
                        .map_err(|_| ConfigError::InvalidValue(key, s.clone()))
                })
                .transpose()
        };
        let narrowed = |key: &'static str| -> Result<Option<i64>, ConfigError> {
            parsed(key)?
                .map(|v| i64::try_from(v).map_err(|_| ConfigError::InvalidValue(key, v.to_string())))
                .transpose()
        };
        let flag = |key: &'static str| {
            lookup(key).is_some_and(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
        };

        let store = match lookup("SESSION_STORE").as_deref() {
            None | Some("memory") => SessionStoreKind::Memory,
            Some("redis") => SessionStoreKind::Redis,
            Some(other) => {
                return Err(ConfigError::InvalidValue("SESSION_STORE", other.to_string()))
            }
        };

        let redis = match lookup("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: parsed("REDIS_MAX_CONNECTIONS")?
                    .map(|v| {
                        u32::try_from(v).map_err(|_| {
                            ConfigError::InvalidValue("REDIS_MAX_CONNECTIONS", v.to_string())
                        })
                    })
                    .transpose()?
                    .unwrap_or_else(default_redis_max_connections),
            }),
            None if store == SessionStoreKind::Redis => {
                return Err(ConfigError::MissingVar("REDIS_URL"))
            }
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
                site_url: lookup("APP_SITE_URL").unwrap_or_else(default_site_url),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parsed("API_PORT")?
                    .map(|v| {
                        u16::try_from(v)
                            .map_err(|_| ConfigError::InvalidValue("API_PORT", v.to_string()))
                    })
                    .transpose()?
                    .unwrap_or_else(default_port),
                request_timeout_seconds: parsed("API_REQUEST_TIMEOUT_SECONDS")?
                    .unwrap_or_else(default_request_timeout),
            },
            backend: BackendConfig {
                url: lookup("BACKEND_URL").ok_or(ConfigError::MissingVar("BACKEND_URL"))?,
                anon_key: lookup("BACKEND_ANON_KEY")
                    .ok_or(ConfigError::MissingVar("BACKEND_ANON_KEY"))?,
                timeout_seconds: parsed("BACKEND_TIMEOUT_SECONDS")?
                    .unwrap_or_else(default_backend_timeout),
            },
            session: SessionConfig {
                store,
                cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or_else(default_cookie_name),
                cookie_secure: flag("SESSION_COOKIE_SECURE"),
                ttl_seconds: parsed("SESSION_TTL_SECONDS")?.unwrap_or_else(default_session_ttl),
                refresh_margin_seconds: narrowed("AUTH_REFRESH_MARGIN_SECONDS")?
                    .unwrap_or_else(default_refresh_margin),
                idle_timeout_seconds: parsed("SESSION_IDLE_TIMEOUT_SECONDS")?
                    .unwrap_or_else(default_idle_timeout),
            },
            redis,
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
