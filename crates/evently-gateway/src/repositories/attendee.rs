//! REST implementation of AttendeeRepository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use evently_core::{
    AttendeeRepository, AttendeeWithProfile, Caller, DomainError, Event, EventAttendee,
    RepoResult,
};

use crate::client::{Query, RestClient};
use crate::mappers::{attended_events, AttendeeInsert};
use crate::models::{AttendeeRow, AttendeeWithEventRow, AttendeeWithProfileRow};

const TABLE: &str = "event_attendees";

/// REST implementation of AttendeeRepository
#[derive(Clone)]
pub struct RestAttendeeRepository {
    client: Arc<RestClient>,
}

impl RestAttendeeRepository {
    /// Create a new RestAttendeeRepository
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttendeeRepository for RestAttendeeRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        caller: &Caller,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<EventAttendee>> {
        let query = Query::table(TABLE)
            .select("*")
            .eq("event_id", event_id)
            .eq("user_id", user_id);
        let rows: Vec<AttendeeRow> = self.client.select(caller, &query).await?;
        Ok(rows.into_iter().next().map(EventAttendee::from))
    }

    #[instrument(skip(self))]
    async fn join(
        &self,
        caller: &Caller,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<EventAttendee> {
        let query = Query::table(TABLE)
            .select("*")
            .on_conflict(&["event_id", "user_id"]);
        let rows: Vec<AttendeeRow> = self
            .client
            .insert(caller, &query, &[AttendeeInsert { event_id, user_id }])
            .await?;

        if let Some(row) = rows.into_iter().next() {
            return Ok(row.into());
        }

        // Duplicate ignored by the upsert; the existing row is the result
        self.find(caller, event_id, user_id)
            .await?
            .ok_or(DomainError::AttendeeNotFound)
    }

    #[instrument(skip(self))]
    async fn leave(&self, caller: &Caller, event_id: Uuid, user_id: Uuid) -> RepoResult<u64> {
        let query = Query::table(TABLE)
            .select("id")
            .eq("event_id", event_id)
            .eq("user_id", user_id);
        let rows: Vec<serde_json::Value> = self.client.delete(caller, &query).await?;
        Ok(rows.len() as u64)
    }

    #[instrument(skip(self))]
    async fn list_by_event(
        &self,
        caller: &Caller,
        event_id: Uuid,
    ) -> RepoResult<Vec<AttendeeWithProfile>> {
        let query = Query::table(TABLE)
            .select("*, profiles(*)")
            .eq("event_id", event_id)
            .order("created_at", true);
        let rows: Vec<AttendeeWithProfileRow> = self.client.select(caller, &query).await?;
        Ok(rows.into_iter().map(AttendeeWithProfile::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_events_for_user(
        &self,
        caller: &Caller,
        user_id: Uuid,
    ) -> RepoResult<Vec<Event>> {
        let query = Query::table(TABLE)
            .select("*, events(*)")
            .eq("user_id", user_id);
        let rows: Vec<AttendeeWithEventRow> = self.client.select(caller, &query).await?;

        let mut events = attended_events(rows);
        events.sort_by_key(|e| e.date);
        Ok(events)
    }
}
