//! Caller identity attached to every data request

use uuid::Uuid;

use crate::error::DomainError;

/// Who a data request is made on behalf of
///
/// The hosted backend applies its row-level policies to the caller's access
/// token, so every gateway call carries one of these.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Caller {
    /// No session; only the public API key is sent
    #[default]
    Anonymous,
    /// Signed-in user with a live access token
    User { id: Uuid, access_token: String },
}

impl Caller {
    pub fn user(id: Uuid, access_token: impl Into<String>) -> Self {
        Self::User {
            id,
            access_token: access_token.into(),
        }
    }

    /// Signed-in user id, if any
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::User { id, .. } => Some(*id),
        }
    }

    /// Access token, if any
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User { access_token, .. } => Some(access_token),
        }
    }

    /// Signed-in user id or `NotAuthenticated`
    pub fn require_user(&self) -> Result<Uuid, DomainError> {
        self.user_id().ok_or(DomainError::NotAuthenticated)
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl std::fmt::Debug for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::User { id, .. } => f.debug_struct("User").field("id", id).finish_non_exhaustive(),
        }
    }
}
