//! # evently-core
//!
//! Domain layer containing entities, value objects, ports, and session events.
//! This crate has zero dependencies on infrastructure (HTTP client, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod search;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AttendeeWithProfile, AuthIdentity, AuthSession, Event, EventAttendee, EventPatch, NewEvent,
    NewProfile, Profile, ProfilePatch, SignUpOutcome, UserMetadata,
};
pub use error::DomainError;
pub use events::AuthChangeEvent;
pub use search::{filter_events, matches_query, EventView};
pub use traits::{
    AttendeeRepository, AuthProvider, EventRepository, ProfileRepository, RepoResult,
    SessionStore,
};
pub use value_objects::{Caller, EventStatus, ParseEventStatusError, SessionKey};
