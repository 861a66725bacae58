//! Attendee row models, plain and with embedded resources

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{EventRow, ProfileRow};

/// Row of the `event_attendees` table
#[derive(Debug, Clone, Deserialize)]
pub struct AttendeeRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub event_id: Uuid,
    pub user_id: Uuid,
}

/// Attendee row selected with `*, profiles(*)`
#[derive(Debug, Clone, Deserialize)]
pub struct AttendeeWithProfileRow {
    #[serde(flatten)]
    pub attendee: AttendeeRow,
    #[serde(default)]
    pub profiles: Option<ProfileRow>,
}

/// Attendee row selected with `*, events(*)`
#[derive(Debug, Clone, Deserialize)]
pub struct AttendeeWithEventRow {
    #[serde(flatten)]
    pub attendee: AttendeeRow,
    #[serde(default)]
    pub events: Option<EventRow>,
}
