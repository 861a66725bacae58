//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use evently_core::EventStatus;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Where the browser should go next, with an optional notice to display
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RedirectResponse {
    pub redirect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RedirectResponse {
    pub fn to(redirect: impl Into<String>) -> Self {
        Self {
            redirect: redirect.into(),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Plain acknowledgement carrying a user-facing notice
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Session / Profile Responses
// ============================================================================

/// Profile as shown in the header, the profile page, and attendee lists
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub initials: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Current browser session state
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: Option<ProfileResponse>,
    pub loading: bool,
}

// ============================================================================
// Event Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: EventStatus,
    /// Organizer's user id
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A list page's events
///
/// A failed read yields an empty list and an `error` notice instead of a
/// failed request.
#[derive(Debug, Clone, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventListResponse {
    pub fn new(events: Vec<EventResponse>) -> Self {
        Self {
            total: events.len(),
            events,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            events: Vec::new(),
            total: 0,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttendeeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub profile: Option<ProfileResponse>,
}

/// Attendance state of one event for the current user
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceResponse {
    pub event_id: Uuid,
    pub attendees: Vec<AttendeeResponse>,
    pub attendee_count: usize,
    pub is_attending: bool,
}

/// Event detail page
#[derive(Debug, Clone, Serialize)]
pub struct EventDetailsResponse {
    pub event: EventResponse,
    pub organizer: Option<ProfileResponse>,
    pub attendees: Vec<AttendeeResponse>,
    pub attendee_count: usize,
    pub is_attending: bool,
    pub is_organizer: bool,
    /// Link to copy when sharing the event
    pub share_url: String,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Readiness with the state of each dependency
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub session_store: bool,
}

impl ReadinessResponse {
    pub fn from_checks(session_store: bool) -> Self {
        Self {
            status: if session_store { "ready" } else { "not_ready" },
            session_store,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.session_store
    }
}
