//! Event entity <-> row mapper

use chrono::NaiveDate;
use evently_core::{Event, EventPatch, EventStatus, NewEvent};
use serde::Serialize;
use uuid::Uuid;

use crate::models::EventRow;

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            created_at: row.created_at,
            title: row.title,
            description: row.description,
            date: row.date,
            time: row.time,
            location: row.location,
            image_url: row.image_url,
            status: row.status,
            user_id: row.user_id,
        }
    }
}

/// Insert payload for `events`; `id` and `created_at` are assigned by the store
#[derive(Debug, Serialize)]
pub struct EventInsert<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub date: NaiveDate,
    pub time: &'a str,
    pub location: &'a str,
    pub image_url: Option<&'a str>,
    pub status: EventStatus,
    pub user_id: Uuid,
}

impl<'a> From<&'a NewEvent> for EventInsert<'a> {
    fn from(event: &'a NewEvent) -> Self {
        Self {
            title: &event.title,
            description: &event.description,
            date: event.date,
            time: &event.time,
            location: &event.location,
            image_url: event.image_url.as_deref(),
            status: event.status,
            user_id: event.user_id,
        }
    }
}

/// Update payload for `events`
#[derive(Debug, Serialize)]
pub struct EventUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

impl<'a> From<&'a EventPatch> for EventUpdate<'a> {
    fn from(patch: &'a EventPatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            description: patch.description.as_deref(),
            date: patch.date,
            time: patch.time.as_deref(),
            location: patch.location.as_deref(),
            image_url: patch.image_url.as_ref().map(Option::as_deref),
            status: patch.status,
        }
    }
}
