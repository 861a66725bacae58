//! # evently-common
//!
//! Shared utilities including configuration, error handling, access-token
//! handling, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{inspect_access_token, AccessTokenClaims, JwtService};
pub use config::{
    AppConfig, AppSettings, BackendConfig, ConfigError, CorsConfig, Environment, RedisConfig,
    ServerConfig, SessionConfig, SessionStoreKind,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    LogFormat, TracingConfig, TracingError,
};
