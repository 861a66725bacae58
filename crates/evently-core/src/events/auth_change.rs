//! Auth state change events
//!
//! Delivered to session listeners whenever the provider session changes.

use serde::{Deserialize, Serialize};

/// Kind of auth state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    /// Session restored (or found absent) at bootstrap
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    /// Session established from a password recovery link
    PasswordRecovery,
}

impl AuthChangeEvent {
    /// True for events that leave a session in place
    pub fn keeps_session(self) -> bool {
        !matches!(self, Self::SignedOut)
    }
}
