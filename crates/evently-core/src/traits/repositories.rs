//! Repository traits (ports) - define the interface for data access
//!
//! Every call is a single round trip to the hosted backend, made on behalf of
//! a [`Caller`] so the backend can apply its row-level policies. There is no
//! caching, retrying, or batching behind these traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    AttendeeWithProfile, Event, EventAttendee, EventPatch, NewEvent, NewProfile, Profile,
    ProfilePatch,
};
use crate::error::DomainError;
use crate::value_objects::Caller;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Event Repository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// List all events ordered by date ascending
    async fn list(&self, caller: &Caller) -> RepoResult<Vec<Event>>;

    /// List events organized by a user, ordered by date ascending
    async fn list_by_organizer(&self, caller: &Caller, user_id: Uuid) -> RepoResult<Vec<Event>>;

    /// Find event by ID
    async fn find_by_id(&self, caller: &Caller, id: Uuid) -> RepoResult<Option<Event>>;

    /// Create a new event and return the stored row
    async fn create(&self, caller: &Caller, event: &NewEvent) -> RepoResult<Event>;

    /// Apply a partial update and return the stored row
    async fn update(&self, caller: &Caller, id: Uuid, patch: &EventPatch) -> RepoResult<Event>;

    /// Delete an event (attendee rows go with it)
    async fn delete(&self, caller: &Caller, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by ID
    async fn find_by_id(&self, caller: &Caller, id: Uuid) -> RepoResult<Option<Profile>>;

    /// Create the profile mirroring an auth identity
    async fn create(&self, caller: &Caller, profile: &NewProfile) -> RepoResult<Profile>;

    /// Apply a partial update and return the stored row
    async fn update(&self, caller: &Caller, id: Uuid, patch: &ProfilePatch)
        -> RepoResult<Profile>;
}

// ============================================================================
// Attendee Repository
// ============================================================================

#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Find the attendee row for a (event, user) pair
    async fn find(
        &self,
        caller: &Caller,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<EventAttendee>>;

    /// Join an event; joining twice yields the existing row, never a duplicate
    async fn join(&self, caller: &Caller, event_id: Uuid, user_id: Uuid)
        -> RepoResult<EventAttendee>;

    /// Leave an event; returns the number of rows removed (zero is not an error)
    async fn leave(&self, caller: &Caller, event_id: Uuid, user_id: Uuid) -> RepoResult<u64>;

    /// Attendees of an event joined with their profiles
    async fn list_by_event(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> RepoResult<Vec<AttendeeWithProfile>>;

    /// Events a user attends, ordered by date ascending
    async fn list_events_for_user(&self, caller: &Caller, user_id: Uuid)
        -> RepoResult<Vec<Event>>;
}
