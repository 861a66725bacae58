//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Messages are the inline form messages shown next to each field.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidateUrl, ValidationError};

use evently_core::{EventStatus, EventView};

/// Accepts an empty string or an absolute URL
fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("Please enter a valid URL.".into()))
    }
}

/// Empty strings clear a nullable column
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Sign-in form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    #[validate(length(min = 1, message = "Please enter your password."))]
    pub password: String,
}

/// Sign-up form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,

    #[validate(length(min = 2, message = "First name must be at least 2 characters."))]
    pub first_name: String,

    #[validate(length(min = 2, message = "Last name must be at least 2 characters."))]
    pub last_name: String,
}

/// Forgot-password form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
}

/// Tokens carried by a password recovery link
#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Reset-password form
///
/// When opened from a recovery link the form carries the link's tokens;
/// otherwise the current session's user is updated.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[serde(default)]
    pub recovery: Option<RecoveryTokens>,
}

// ============================================================================
// Event Requests
// ============================================================================

/// Create event form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters."))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters."))]
    pub description: String,

    pub date: NaiveDate,

    #[validate(length(min = 1, message = "Please enter a time."))]
    pub time: String,

    #[validate(length(min = 3, message = "Location must be at least 3 characters."))]
    pub location: String,

    #[serde(default)]
    pub status: EventStatus,

    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: Option<String>,
}

/// Edit event form; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters."))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Description must be at least 10 characters."))]
    pub description: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "Please enter a time."))]
    pub time: Option<String>,

    #[validate(length(min = 3, message = "Location must be at least 3 characters."))]
    pub location: Option<String>,

    pub status: Option<EventStatus>,

    /// An empty string removes the image
    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: Option<String>,
}

/// Dashboard list query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub view: EventView,
}

impl EventListQuery {
    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

/// Search-only query used by the "my events" and "attending" pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Profile form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "First name must be at least 2 characters."))]
    pub first_name: String,

    #[validate(length(min = 2, message = "Last name must be at least 2 characters."))]
    pub last_name: String,

    /// An empty string removes the avatar
    #[validate(custom(function = "validate_optional_url"))]
    pub avatar_url: Option<String>,

    /// An empty string removes the bio
    #[validate(length(max = 500, message = "Bio must not exceed 500 characters."))]
    pub bio: Option<String>,
}
