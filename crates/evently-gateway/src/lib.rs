//! # evently-gateway
//!
//! Data gateway implementing the repository and auth ports from `evently-core`.
//!
//! ## Overview
//!
//! Two backends are provided:
//!
//! - REST: talks to the hosted backend's PostgREST data API and GoTrue auth
//!   API over `reqwest`. Row-level policies are enforced by the service
//!   against the caller's access token.
//! - Memory: an in-process backend enforcing the same policies, used for
//!   local development and tests.
//!
//! Every operation is a single round trip. Nothing is cached, retried, or
//! batched.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use evently_common::AppConfig;
//! use evently_gateway::{RestClient, RestEventRepository};
//!
//! let config = AppConfig::from_env()?;
//! let client = Arc::new(RestClient::new(&config.backend)?);
//! let events = RestEventRepository::new(client.clone());
//! ```

pub mod auth;
pub mod client;
pub mod mappers;
pub mod memory;
pub mod models;
pub mod repositories;

// Re-export commonly used types
pub use auth::GoTrueClient;
pub use client::{Query, RestClient};
pub use memory::{MemoryBackend, MemoryOptions};
pub use repositories::{RestAttendeeRepository, RestEventRepository, RestProfileRepository};
