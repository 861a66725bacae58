//! # evently-api
//!
//! HTTP backend-for-frontend built with Axum. Every page of the site maps to
//! a handful of JSON endpoints; each browser is tracked by a session cookie
//! and served by its own `SessionManager`.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
