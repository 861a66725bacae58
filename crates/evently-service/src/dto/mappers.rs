//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs, and
//! from request DTOs to domain inputs.

use uuid::Uuid;

use evently_core::{AttendeeWithProfile, Event, EventPatch, NewEvent, Profile, ProfilePatch};

use super::requests::{blank_to_none, CreateEventRequest, UpdateEventRequest, UpdateProfileRequest};
use super::responses::{AttendeeResponse, EventResponse, ProfileResponse};

// ============================================================================
// Profile Mappers
// ============================================================================

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            full_name: profile.full_name(),
            initials: profile.initials(),
            email: profile.email.clone(),
            avatar_url: profile.avatar_url.clone(),
            bio: profile.bio.clone(),
            created_at: profile.created_at,
        }
    }
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self::from(&profile)
    }
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            first_name: Some(request.first_name),
            last_name: Some(request.last_name),
            email: None,
            avatar_url: request.avatar_url.map(|v| blank_to_none(Some(v))),
            bio: request.bio.map(|v| blank_to_none(Some(v))),
        }
    }
}

// ============================================================================
// Event Mappers
// ============================================================================

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            time: event.time.clone(),
            location: event.location.clone(),
            image_url: event.image_url.clone(),
            status: event.status,
            user_id: event.user_id,
            created_at: event.created_at,
        }
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self::from(&event)
    }
}

impl CreateEventRequest {
    /// Domain input for an event organized by `organizer`
    pub fn into_new_event(self, organizer: Uuid) -> NewEvent {
        NewEvent {
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            location: self.location,
            image_url: blank_to_none(self.image_url),
            status: self.status,
            user_id: organizer,
        }
    }
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(request: UpdateEventRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            date: request.date,
            time: request.time,
            location: request.location,
            image_url: request.image_url.map(|v| blank_to_none(Some(v))),
            status: request.status,
        }
    }
}

// ============================================================================
// Attendee Mappers
// ============================================================================

impl From<&AttendeeWithProfile> for AttendeeResponse {
    fn from(row: &AttendeeWithProfile) -> Self {
        Self {
            id: row.attendee.id,
            user_id: row.attendee.user_id,
            joined_at: row.attendee.created_at,
            profile: row.profile.as_ref().map(ProfileResponse::from),
        }
    }
}
