//! Repository ports over the in-memory tables

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use evently_core::{
    AttendeeRepository, AttendeeWithProfile, Caller, DomainError, Event, EventAttendee,
    EventPatch, EventRepository, NewEvent, NewProfile, Profile, ProfilePatch, ProfileRepository,
    RepoResult,
};

use super::MemoryBackend;

fn by_date(events: &mut [Event]) {
    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
}

// ============================================================================
// Events
// ============================================================================

#[async_trait]
impl EventRepository for MemoryBackend {
    #[instrument(skip(self))]
    async fn list(&self, caller: &Caller) -> RepoResult<Vec<Event>> {
        if self.authenticate(caller).await?.is_none() {
            return Ok(Vec::new());
        }
        let mut events: Vec<Event> = self.tables.read().await.events.values().cloned().collect();
        by_date(&mut events);
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn list_by_organizer(&self, caller: &Caller, user_id: Uuid) -> RepoResult<Vec<Event>> {
        if self.authenticate(caller).await?.is_none() {
            return Ok(Vec::new());
        }
        let mut events: Vec<Event> = self
            .tables
            .read()
            .await
            .events
            .values()
            .filter(|e| e.is_organized_by(user_id))
            .cloned()
            .collect();
        by_date(&mut events);
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, caller: &Caller, id: Uuid) -> RepoResult<Option<Event>> {
        if self.authenticate(caller).await?.is_none() {
            return Ok(None);
        }
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    #[instrument(skip(self, event), fields(title = %event.title))]
    async fn create(&self, caller: &Caller, event: &NewEvent) -> RepoResult<Event> {
        let user_id = self.require_user(caller, "event insert").await?;
        if event.user_id != user_id {
            return Err(DomainError::PolicyViolation(
                "events may only be created for yourself".to_string(),
            ));
        }

        let event = event.clone().into_event(Uuid::new_v4(), Utc::now());
        self.tables
            .write()
            .await
            .events
            .insert(event.id, event.clone());
        debug!(event_id = %event.id, "Event stored");
        Ok(event)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, caller: &Caller, id: Uuid, patch: &EventPatch) -> RepoResult<Event> {
        let user_id = self.require_user(caller, "event update").await?;
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&id)
            .ok_or(DomainError::EventNotFound(id))?;

        if !event.is_organized_by(user_id) {
            return Err(DomainError::PolicyViolation(format!("update event {id}")));
        }

        event.apply(patch);
        Ok(event.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, caller: &Caller, id: Uuid) -> RepoResult<()> {
        let user_id = self.require_user(caller, "event delete").await?;
        let mut tables = self.tables.write().await;
        let event = tables.events.get(&id).ok_or(DomainError::EventNotFound(id))?;

        if !event.is_organized_by(user_id) {
            return Err(DomainError::PolicyViolation(format!("delete event {id}")));
        }

        tables.events.remove(&id);
        let before = tables.attendees.len();
        tables.attendees.retain(|a| a.event_id != id);
        debug!(
            event_id = %id,
            attendees_removed = before - tables.attendees.len(),
            "Event deleted"
        );
        Ok(())
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[async_trait]
impl ProfileRepository for MemoryBackend {
    #[instrument(skip(self))]
    async fn find_by_id(&self, caller: &Caller, id: Uuid) -> RepoResult<Option<Profile>> {
        if self.authenticate(caller).await?.is_none() {
            return Ok(None);
        }
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    #[instrument(skip(self, profile), fields(id = %profile.id))]
    async fn create(&self, caller: &Caller, profile: &NewProfile) -> RepoResult<Profile> {
        let user_id = self.require_user(caller, "profile insert").await?;
        if profile.id != user_id {
            return Err(DomainError::PolicyViolation(
                "profiles may only be created for yourself".to_string(),
            ));
        }
        if self.take_profile_insert_failure() {
            return Err(DomainError::BackendError(
                "profile insert failed".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        if tables.profiles.contains_key(&profile.id) {
            return Err(DomainError::DuplicateRecord(format!("profile {}", profile.id)));
        }

        let stored = Profile {
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            avatar_url: None,
            bio: None,
            created_at: Utc::now(),
        };
        tables.profiles.insert(stored.id, stored.clone());
        Ok(stored)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, caller: &Caller, id: Uuid, patch: &ProfilePatch) -> RepoResult<Profile> {
        let user_id = self.require_user(caller, "profile update").await?;
        let mut tables = self.tables.write().await;
        let profile = tables
            .profiles
            .get_mut(&id)
            .ok_or(DomainError::ProfileNotFound(id))?;

        if profile.id != user_id {
            return Err(DomainError::PolicyViolation(format!("update profile {id}")));
        }

        profile.apply(patch);
        Ok(profile.clone())
    }
}

// ============================================================================
// Attendees
// ============================================================================

#[async_trait]
impl AttendeeRepository for MemoryBackend {
    #[instrument(skip(self))]
    async fn find(
        &self,
        caller: &Caller,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<EventAttendee>> {
        if self.authenticate(caller).await?.is_none() {
            return Ok(None);
        }
        Ok(self
            .tables
            .read()
            .await
            .attendees
            .iter()
            .find(|a| a.links(event_id, user_id))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn join(
        &self,
        caller: &Caller,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<EventAttendee> {
        let caller_id = self.require_user(caller, "attendee insert").await?;
        if caller_id != user_id {
            return Err(DomainError::PolicyViolation(
                "events may only be joined as yourself".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&event_id) {
            return Err(DomainError::EventNotFound(event_id));
        }
        if let Some(existing) = tables.attendees.iter().find(|a| a.links(event_id, user_id)) {
            return Ok(existing.clone());
        }

        let row = EventAttendee::new(event_id, user_id);
        tables.attendees.push(row.clone());
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn leave(&self, caller: &Caller, event_id: Uuid, user_id: Uuid) -> RepoResult<u64> {
        let caller_id = self.require_user(caller, "attendee delete").await?;
        if caller_id != user_id {
            // Rows of other users are invisible to the delete
            return Ok(0);
        }

        let mut tables = self.tables.write().await;
        let before = tables.attendees.len();
        tables.attendees.retain(|a| !a.links(event_id, user_id));
        Ok((before - tables.attendees.len()) as u64)
    }

    #[instrument(skip(self))]
    async fn list_by_event(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> RepoResult<Vec<AttendeeWithProfile>> {
        if self.authenticate(caller).await?.is_none() {
            return Ok(Vec::new());
        }

        let tables = self.tables.read().await;
        let mut rows: Vec<AttendeeWithProfile> = tables
            .attendees
            .iter()
            .filter(|a| a.event_id == event_id)
            .map(|a| AttendeeWithProfile {
                attendee: a.clone(),
                profile: tables.profiles.get(&a.user_id).cloned(),
            })
            .collect();
        rows.sort_by_key(|r| r.attendee.created_at);
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn list_events_for_user(
        &self,
        caller: &Caller,
        user_id: Uuid,
    ) -> RepoResult<Vec<Event>> {
        if self.authenticate(caller).await?.is_none() {
            return Ok(Vec::new());
        }

        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .attendees
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| tables.events.get(&a.event_id).cloned())
            .collect();
        by_date(&mut events);
        Ok(events)
    }
}
