//! Event row model

use chrono::{DateTime, NaiveDate, Utc};
use evently_core::EventStatus;
use serde::Deserialize;
use uuid::Uuid;

/// Row of the `events` table
#[derive(Debug, Clone, Deserialize)]
pub struct EventRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    pub user_id: Uuid,
}
