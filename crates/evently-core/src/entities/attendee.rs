//! Attendee entity - junction between Profile and Event

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Profile;

/// Event attendee entity
///
/// At most one row exists per `(event_id, user_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAttendee {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub event_id: Uuid,
    pub user_id: Uuid,
}

impl EventAttendee {
    /// Create a new attendee row
    pub fn new(event_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            event_id,
            user_id,
        }
    }

    /// Check if this row links the given pair
    #[inline]
    pub fn links(&self, event_id: Uuid, user_id: Uuid) -> bool {
        self.event_id == event_id && self.user_id == user_id
    }
}

/// Attendee row joined with its profile
///
/// The profile is missing when the attendee never completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeWithProfile {
    pub attendee: EventAttendee,
    pub profile: Option<Profile>,
}

impl AttendeeWithProfile {
    /// Attending user id
    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.attendee.user_id
    }
}
