//! Event service
//!
//! Handles the dashboard, event detail, and organizer pages.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use evently_core::{filter_events, Caller, DomainError, Event, EventPatch};

use crate::dto::{
    AttendeeResponse, CreateEventRequest, EventDetailsResponse, EventListQuery,
    EventListResponse, EventResponse, ProfileResponse, SearchQuery, UpdateEventRequest,
};
use crate::session::Route;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Event service
pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    /// Create a new EventService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Dashboard: every event matching the search and view filter
    #[instrument(skip(self))]
    pub async fn list_events(&self, caller: &Caller, query: &EventListQuery) -> EventListResponse {
        match self.ctx.event_repo().list(caller).await {
            Ok(events) => EventListResponse::new(
                filter_events(events, query.query())
                    .iter()
                    .filter(|event| query.view.includes(event))
                    .map(EventResponse::from)
                    .collect(),
            ),
            Err(e) => {
                warn!(error = %e, "Failed to load events");
                EventListResponse::failed("Failed to load events")
            }
        }
    }

    /// Events organized by the caller
    #[instrument(skip(self))]
    pub async fn my_events(
        &self,
        caller: &Caller,
        query: &SearchQuery,
    ) -> ServiceResult<EventListResponse> {
        let user_id = caller.require_user()?;

        Ok(
            match self.ctx.event_repo().list_by_organizer(caller, user_id).await {
                Ok(events) => EventListResponse::new(
                    filter_events(events, query.query())
                        .iter()
                        .map(EventResponse::from)
                        .collect(),
                ),
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Failed to load organized events");
                    EventListResponse::failed("Failed to load your events")
                }
            },
        )
    }

    /// Fetch an event or fail with not found
    pub async fn get_event(&self, caller: &Caller, event_id: Uuid) -> ServiceResult<Event> {
        self.ctx
            .event_repo()
            .find_by_id(caller, event_id)
            .await?
            .ok_or_else(|| DomainError::EventNotFound(event_id).into())
    }

    /// Event detail page
    #[instrument(skip(self))]
    pub async fn get_event_details(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> ServiceResult<EventDetailsResponse> {
        let event = self.get_event(caller, event_id).await?;

        let organizer = match self.ctx.profile_repo().find_by_id(caller, event.user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(organizer_id = %event.user_id, error = %e, "Failed to load organizer");
                None
            }
        };

        let attendees = self
            .ctx
            .attendee_repo()
            .list_by_event(caller, event_id)
            .await?;

        let me = caller.user_id();
        let is_attending = me.is_some_and(|id| attendees.iter().any(|a| a.user_id() == id));
        let is_organizer = me.is_some_and(|id| event.is_organized_by(id));

        Ok(EventDetailsResponse {
            share_url: self
                .ctx
                .settings()
                .site_link(&Route::Event(event.id).path()),
            event: EventResponse::from(&event),
            organizer: organizer.as_ref().map(ProfileResponse::from),
            attendee_count: attendees.len(),
            attendees: attendees.iter().map(AttendeeResponse::from).collect(),
            is_attending,
            is_organizer,
        })
    }

    /// Event as loaded by the edit page; organizer only
    #[instrument(skip(self))]
    pub async fn get_event_for_edit(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> ServiceResult<EventResponse> {
        let event = self.get_event(caller, event_id).await?;
        ensure_organizer(caller, &event)?;
        Ok(EventResponse::from(&event))
    }

    #[instrument(skip(self, request))]
    pub async fn create_event(
        &self,
        caller: &Caller,
        request: CreateEventRequest,
    ) -> ServiceResult<EventResponse> {
        let organizer = caller.require_user()?;
        let event = self
            .ctx
            .event_repo()
            .create(caller, &request.into_new_event(organizer))
            .await?;

        info!(event_id = %event.id, organizer_id = %organizer, "Event created");
        Ok(EventResponse::from(&event))
    }

    /// Apply an edit and return the event as stored afterwards
    #[instrument(skip(self, request))]
    pub async fn update_event(
        &self,
        caller: &Caller,
        event_id: Uuid,
        request: UpdateEventRequest,
    ) -> ServiceResult<EventResponse> {
        let event = self.get_event(caller, event_id).await?;
        ensure_organizer(caller, &event)?;

        let patch = EventPatch::from(request);
        if patch.is_empty() {
            return Ok(EventResponse::from(&event));
        }

        self.ctx.event_repo().update(caller, event_id, &patch).await?;
        info!(event_id = %event_id, "Event updated");

        let stored = self.get_event(caller, event_id).await?;
        Ok(EventResponse::from(&stored))
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, caller: &Caller, event_id: Uuid) -> ServiceResult<Route> {
        let event = self.get_event(caller, event_id).await?;
        ensure_organizer(caller, &event)?;

        self.ctx.event_repo().delete(caller, event_id).await?;
        info!(event_id = %event_id, "Event deleted");
        Ok(Route::MyEvents)
    }
}

fn ensure_organizer(caller: &Caller, event: &Event) -> Result<(), DomainError> {
    let user_id = caller.require_user()?;
    if event.is_organized_by(user_id) {
        Ok(())
    } else {
        Err(DomainError::NotOrganizer)
    }
}
