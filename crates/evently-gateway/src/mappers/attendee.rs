//! Attendee entity <-> row mapper

use evently_core::{AttendeeWithProfile, Event, EventAttendee};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{AttendeeRow, AttendeeWithEventRow, AttendeeWithProfileRow};

impl From<AttendeeRow> for EventAttendee {
    fn from(row: AttendeeRow) -> Self {
        EventAttendee {
            id: row.id,
            created_at: row.created_at,
            event_id: row.event_id,
            user_id: row.user_id,
        }
    }
}

impl From<AttendeeWithProfileRow> for AttendeeWithProfile {
    fn from(row: AttendeeWithProfileRow) -> Self {
        AttendeeWithProfile {
            attendee: row.attendee.into(),
            profile: row.profiles.map(Into::into),
        }
    }
}

/// Events embedded in attendee rows; rows whose event is hidden are skipped
pub(crate) fn attended_events(rows: Vec<AttendeeWithEventRow>) -> Vec<Event> {
    rows.into_iter()
        .filter_map(|row| row.events)
        .map(Event::from)
        .collect()
}

/// Insert payload for `event_attendees`
#[derive(Debug, Serialize)]
pub struct AttendeeInsert {
    pub event_id: Uuid,
    pub user_id: Uuid,
}
