//! Test fixtures and data generators
//!
//! Provides reusable request bodies and response shapes for integration
//! tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

// ============================================================================
// Requests
// ============================================================================

/// Sign-up form
#[derive(Debug, Clone, Serialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignUpForm {
    pub fn unique(first_name: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("{}{suffix}@example.com", first_name.to_lowercase()),
            password: "TestPass123!".to_string(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
        }
    }

    pub fn sign_in(&self) -> SignInForm {
        SignInForm {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Sign-in form
#[derive(Debug, Clone, Serialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Create-event form
#[derive(Debug, Clone, Serialize)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl EventForm {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Community Meetup {suffix}"),
            description: "An evening of talks and pizza".to_string(),
            date: "2026-11-03".to_string(),
            time: "18:30".to_string(),
            location: "Town Hall".to_string(),
            image_url: None,
        }
    }

    pub fn on(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }
}

// ============================================================================
// Responses
// ============================================================================

/// `{ "data": ... }` wrapper
#[derive(Debug, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// Navigation answer
#[derive(Debug, Deserialize)]
pub struct RedirectBody {
    pub redirect: String,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionBody {
    pub user: Option<ProfileBody>,
    pub loading: bool,
}

#[derive(Debug, Deserialize)]
pub struct EventBody {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct EventListBody {
    pub events: Vec<EventBody>,
    pub total: usize,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttendeeBody {
    pub user_id: String,
    pub profile: Option<ProfileBody>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceBody {
    pub attendees: Vec<AttendeeBody>,
    pub attendee_count: usize,
    pub is_attending: bool,
}

#[derive(Debug, Deserialize)]
pub struct EventDetailsBody {
    pub event: EventBody,
    pub organizer: Option<ProfileBody>,
    pub attendees: Vec<AttendeeBody>,
    pub attendee_count: usize,
    pub is_attending: bool,
    pub is_organizer: bool,
    pub share_url: String,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub redirect: Option<String>,
}
