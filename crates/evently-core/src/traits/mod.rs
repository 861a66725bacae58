//! Ports implemented by the infrastructure crates

mod auth;
mod repositories;

pub use auth::{AuthProvider, SessionStore};
pub use repositories::{AttendeeRepository, EventRepository, ProfileRepository, RepoResult};
