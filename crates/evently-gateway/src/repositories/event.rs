//! REST implementation of EventRepository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use evently_core::{Caller, DomainError, Event, EventPatch, EventRepository, NewEvent, RepoResult};

use crate::client::{Query, RestClient};
use crate::mappers::{EventInsert, EventUpdate};
use crate::models::EventRow;

const TABLE: &str = "events";

/// REST implementation of EventRepository
#[derive(Clone)]
pub struct RestEventRepository {
    client: Arc<RestClient>,
}

impl RestEventRepository {
    /// Create a new RestEventRepository
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    /// Explain why a filtered write touched no rows
    async fn missing_or_denied(&self, caller: &Caller, id: Uuid, action: &str) -> DomainError {
        match self.find_by_id(caller, id).await {
            Ok(Some(_)) => DomainError::PolicyViolation(format!("{action} event {id}")),
            Ok(None) => DomainError::EventNotFound(id),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl EventRepository for RestEventRepository {
    #[instrument(skip(self))]
    async fn list(&self, caller: &Caller) -> RepoResult<Vec<Event>> {
        let query = Query::table(TABLE).select("*").order("date", true);
        let rows: Vec<EventRow> = self.client.select(caller, &query).await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_organizer(&self, caller: &Caller, user_id: Uuid) -> RepoResult<Vec<Event>> {
        let query = Query::table(TABLE)
            .select("*")
            .eq("user_id", user_id)
            .order("date", true);
        let rows: Vec<EventRow> = self.client.select(caller, &query).await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, caller: &Caller, id: Uuid) -> RepoResult<Option<Event>> {
        let query = Query::table(TABLE).select("*").eq("id", id);
        let rows: Vec<EventRow> = self.client.select(caller, &query).await?;
        Ok(rows.into_iter().next().map(Event::from))
    }

    #[instrument(skip(self, event), fields(title = %event.title))]
    async fn create(&self, caller: &Caller, event: &NewEvent) -> RepoResult<Event> {
        let query = Query::table(TABLE).select("*");
        let rows: Vec<EventRow> = self
            .client
            .insert(caller, &query, &[EventInsert::from(event)])
            .await?;

        rows.into_iter()
            .next()
            .map(Event::from)
            .ok_or_else(|| DomainError::PolicyViolation("create event".to_string()))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, caller: &Caller, id: Uuid, patch: &EventPatch) -> RepoResult<Event> {
        let query = Query::table(TABLE).select("*").eq("id", id);
        let rows: Vec<EventRow> = self
            .client
            .update(caller, &query, &EventUpdate::from(patch))
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(row.into()),
            None => Err(self.missing_or_denied(caller, id, "update").await),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, caller: &Caller, id: Uuid) -> RepoResult<()> {
        let query = Query::table(TABLE).select("id").eq("id", id);
        let rows: Vec<serde_json::Value> = self.client.delete(caller, &query).await?;

        if rows.is_empty() {
            return Err(self.missing_or_denied(caller, id, "delete").await);
        }
        Ok(())
    }
}
