//! Event entity - something an organizer schedules and others attend

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::value_objects::EventStatus;

/// Event entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Free-text time, e.g. "18:30" or "All day"
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: EventStatus,
    /// Organizer profile id
    pub user_id: Uuid,
}

impl Event {
    /// Check if a user is the organizer of this event
    #[inline]
    pub fn is_organized_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Check if the event is still upcoming
    #[inline]
    pub fn is_upcoming(&self) -> bool {
        self.status == EventStatus::Upcoming
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = &patch.time {
            self.time.clone_from(time);
        }
        if let Some(location) = &patch.location {
            self.location.clone_from(location);
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url.clone_from(image_url);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Values supplied when creating an event; `id` and `created_at` come from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub user_id: Uuid,
}

impl NewEvent {
    /// Materialize the stored event
    pub fn into_event(self, id: Uuid, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            created_at,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            location: self.location,
            image_url: self.image_url,
            status: self.status,
            user_id: self.user_id,
        }
    }
}

/// Partial event update
///
/// The organizer (`user_id`) is deliberately not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<Option<String>>,
    pub status: Option<EventStatus>,
}

impl EventPatch {
    /// True when the patch would not change any column
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
            && self.image_url.is_none()
            && self.status.is_none()
    }
}
