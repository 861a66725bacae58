//! Auth identity and session issued by the external auth provider

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::Caller;

/// Metadata attached to the auth identity at sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserMetadata {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }
}

/// Identity known to the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Authenticated session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Lifetime of the access token in seconds, as issued
    pub expires_in: i64,
    /// Unix timestamp (seconds) at which the access token expires
    pub expires_at: i64,
    pub user: AuthIdentity,
}

impl AuthSession {
    /// Authenticated user id
    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Check if the access token has expired at the given unix time
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Check if the access token has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Check if the access token expires within `margin_seconds`
    pub fn expires_within(&self, margin_seconds: i64) -> bool {
        self.is_expired_at(Utc::now().timestamp() + margin_seconds)
    }

    /// Caller identity for data requests made on behalf of this session
    pub fn caller(&self) -> Caller {
        Caller::user(self.user.id, self.access_token.clone())
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Result of a sign-up call
///
/// `session` is absent when the provider requires email confirmation first.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub identity: AuthIdentity,
    pub session: Option<AuthSession>,
}
