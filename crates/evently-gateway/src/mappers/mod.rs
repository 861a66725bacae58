//! Entity to row mappers
//!
//! - `From<Row> for Entity`: convert API rows to domain objects
//! - `*Insert`/`*Update` structs: JSON payloads for writes

mod attendee;
mod event;
mod profile;

pub use attendee::AttendeeInsert;
pub(crate) use attendee::attended_events;
pub use event::{EventInsert, EventUpdate};
pub use profile::{ProfileInsert, ProfileUpdate};
