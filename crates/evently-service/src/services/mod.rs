//! Business logic services
//!
//! Services orchestrate gateway calls on behalf of a [`Caller`](evently_core::Caller)
//! and shape the results into response DTOs.

pub mod attendance;
pub mod context;
pub mod error;
pub mod event;
pub mod profile;

pub use attendance::AttendanceService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use profile::ProfileService;
