//! Integration test utilities for the Evently API
//!
//! Spawns the full HTTP stack over the in-process backend and drives it
//! with one cookie-carrying HTTP client per simulated browser.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
