//! Domain entities - core business objects

mod attendee;
mod auth;
mod event;
mod profile;

pub use attendee::{AttendeeWithProfile, EventAttendee};
pub use auth::{AuthIdentity, AuthSession, SignUpOutcome, UserMetadata};
pub use event::{Event, EventPatch, NewEvent};
pub use profile::{NewProfile, Profile, ProfilePatch};
