//! Auth API payload models

use evently_core::UserMetadata;
use serde::Deserialize;
use uuid::Uuid;

/// User object returned by the auth API
#[derive(Debug, Clone, Deserialize)]
pub struct UserModel {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Session object returned by the token and signup endpoints
#[derive(Clone, Deserialize)]
pub struct SessionModel {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    /// Absent on older servers; derived from the token when missing
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: UserModel,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl std::fmt::Debug for SessionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionModel")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Signup returns a session when email confirmation is off, the bare user otherwise
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(SessionModel),
    User(UserModel),
}
