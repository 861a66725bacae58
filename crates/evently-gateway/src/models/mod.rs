//! Row models - serde structs for the data and auth API payloads

mod attendee;
mod auth;
mod event;
mod profile;

pub use attendee::{AttendeeRow, AttendeeWithEventRow, AttendeeWithProfileRow};
pub use auth::{SessionModel, SignUpResponse, UserModel};
pub use event::EventRow;
pub use profile::ProfileRow;
