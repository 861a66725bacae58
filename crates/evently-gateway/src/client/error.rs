//! Mapping of hosted backend failures to `DomainError`

use evently_core::DomainError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Error body returned by the data API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Error body returned by the auth API
///
/// Newer servers send `error_code`/`msg`; older ones send OAuth-style
/// `error`/`error_description`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl AuthErrorBody {
    fn message(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_default()
    }
}

/// Convert a transport failure (timeout, connection refused, bad body)
pub fn map_transport_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::BackendError("Request to backend timed out".to_string())
    } else if e.is_decode() {
        DomainError::BackendError(format!("Invalid backend response: {e}"))
    } else {
        DomainError::BackendError(e.to_string())
    }
}

/// Convert a data API error response
pub fn map_rest_error(status: StatusCode, body: &RestErrorBody) -> DomainError {
    let message = body
        .message
        .clone()
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    match body.code.as_deref() {
        // unique_violation
        Some("23505") => DomainError::DuplicateRecord(message),
        // insufficient_privilege (row-level security)
        Some("42501") => DomainError::PolicyViolation(message),
        // foreign_key_violation, check_violation, invalid_text_representation
        Some("23503" | "23514" | "22P02" | "22007") => DomainError::ValidationError(message),
        // JWT expired
        Some("PGRST301" | "PGRST303") => DomainError::SessionExpired,
        _ => match status {
            StatusCode::UNAUTHORIZED => DomainError::SessionExpired,
            StatusCode::FORBIDDEN => DomainError::PolicyViolation(message),
            StatusCode::BAD_REQUEST => DomainError::ValidationError(message),
            _ => DomainError::BackendError(format!("{status}: {message}")),
        },
    }
}

/// Convert an auth API error response
pub fn map_auth_error(status: StatusCode, body: &AuthErrorBody) -> DomainError {
    let message = body.message();
    let lowered = message.to_lowercase();

    match body.error_code.as_deref() {
        Some("invalid_credentials") => return DomainError::InvalidCredentials,
        Some("email_not_confirmed") => return DomainError::EmailNotConfirmed,
        Some("user_already_exists" | "email_exists") => {
            return DomainError::EmailAlreadyRegistered
        }
        Some("weak_password") => return DomainError::WeakPassword(message),
        Some("email_address_invalid") => return DomainError::InvalidEmail,
        Some(
            "refresh_token_not_found"
            | "refresh_token_already_used"
            | "session_not_found"
            | "session_expired"
            | "bad_jwt",
        ) => return DomainError::SessionExpired,
        _ => {}
    }

    if lowered.contains("invalid login credentials") {
        DomainError::InvalidCredentials
    } else if lowered.contains("email not confirmed") {
        DomainError::EmailNotConfirmed
    } else if lowered.contains("already registered") {
        DomainError::EmailAlreadyRegistered
    } else if lowered.contains("password should be") {
        DomainError::WeakPassword(message)
    } else if body.error.as_deref() == Some("invalid_grant") || status == StatusCode::UNAUTHORIZED
    {
        DomainError::SessionExpired
    } else if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
        DomainError::ValidationError(message)
    } else {
        DomainError::BackendError(format!("{status}: {message}"))
    }
}
