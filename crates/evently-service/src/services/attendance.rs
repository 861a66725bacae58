//! Attendance service
//!
//! Joining and leaving events, and the "attending" page.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use evently_core::{filter_events, Caller};

use crate::dto::{AttendanceResponse, AttendeeResponse, EventListResponse, EventResponse, SearchQuery};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::event::EventService;

/// Attendance service
pub struct AttendanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AttendanceService<'a> {
    /// Create a new AttendanceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Join an event; joining twice leaves a single attendee row
    #[instrument(skip(self))]
    pub async fn join_event(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> ServiceResult<AttendanceResponse> {
        let user_id = caller.require_user()?;
        EventService::new(self.ctx).get_event(caller, event_id).await?;

        let existing = self
            .ctx
            .attendee_repo()
            .find(caller, event_id, user_id)
            .await?;

        if existing.is_some() {
            debug!(event_id = %event_id, user_id = %user_id, "Already attending");
        } else {
            self.ctx
                .attendee_repo()
                .join(caller, event_id, user_id)
                .await?;
            info!(event_id = %event_id, user_id = %user_id, "Joined event");
        }

        self.get_attendance(caller, event_id).await
    }

    /// Leave an event; leaving when not attending changes nothing
    #[instrument(skip(self))]
    pub async fn leave_event(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> ServiceResult<AttendanceResponse> {
        let user_id = caller.require_user()?;

        let removed = self
            .ctx
            .attendee_repo()
            .leave(caller, event_id, user_id)
            .await?;
        info!(event_id = %event_id, user_id = %user_id, removed, "Left event");

        self.get_attendance(caller, event_id).await
    }

    /// Current attendee list of an event
    #[instrument(skip(self))]
    pub async fn get_attendance(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> ServiceResult<AttendanceResponse> {
        let attendees = self
            .ctx
            .attendee_repo()
            .list_by_event(caller, event_id)
            .await?;

        let is_attending = caller
            .user_id()
            .is_some_and(|id| attendees.iter().any(|a| a.user_id() == id));

        Ok(AttendanceResponse {
            event_id,
            attendee_count: attendees.len(),
            attendees: attendees.iter().map(AttendeeResponse::from).collect(),
            is_attending,
        })
    }

    /// Events the caller attends
    #[instrument(skip(self))]
    pub async fn attending_events(
        &self,
        caller: &Caller,
        query: &SearchQuery,
    ) -> ServiceResult<EventListResponse> {
        let user_id = caller.require_user()?;

        Ok(
            match self
                .ctx
                .attendee_repo()
                .list_events_for_user(caller, user_id)
                .await
            {
                Ok(events) => EventListResponse::new(
                    filter_events(events, query.query())
                        .iter()
                        .map(EventResponse::from)
                        .collect(),
                ),
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Failed to load attended events");
                    EventListResponse::failed("Failed to load events you are attending")
                }
            },
        )
    }
}
