//! Repository implementations
//!
//! REST implementations of the repository traits defined in evently-core.
//! Each repository handles one table of the hosted data API.

mod attendee;
mod event;
mod profile;

pub use attendee::RestAttendeeRepository;
pub use event::RestEventRepository;
pub use profile::RestProfileRepository;
