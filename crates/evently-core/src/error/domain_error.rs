//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Attendee not found")]
    AttendeeNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,

    #[error("Email not confirmed")]
    EmailNotConfirmed,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the organizer can modify this event")]
    NotOrganizer,

    #[error("Rejected by access policy: {0}")]
    PolicyViolation(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Duplicate record: {0}")]
    DuplicateRecord(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Session store error: {0}")]
    SessionStoreError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::AttendeeNotFound => "UNKNOWN_ATTENDEE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authentication
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::EmailNotConfirmed => "EMAIL_NOT_CONFIRMED",

            // Authorization
            Self::NotOrganizer => "NOT_ORGANIZER",
            Self::PolicyViolation(_) => "POLICY_VIOLATION",

            // Conflict
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::DuplicateRecord(_) => "DUPLICATE_RECORD",

            // Infrastructure
            Self::BackendError(_) => "BACKEND_ERROR",
            Self::SessionStoreError(_) => "SESSION_STORE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound(_) | Self::ProfileNotFound(_) | Self::AttendeeNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidEmail | Self::WeakPassword(_)
        )
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::NotAuthenticated
                | Self::SessionExpired
                | Self::EmailNotConfirmed
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotOrganizer | Self::PolicyViolation(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyRegistered | Self::DuplicateRecord(_))
    }

    /// HTTP-style status class for this error
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authentication() {
            401
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
