//! Route handlers
//!
//! HTTP request handlers organized by page.

pub mod attendance;
pub mod auth;
pub mod events;
pub mod health;
pub mod me;
pub mod session;
