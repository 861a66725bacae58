//! Session events emitted by the auth provider

mod auth_change;

pub use auth_change::AuthChangeEvent;
