//! # evently-service
//!
//! Application layer containing per-browser session management, business
//! logic, and DTOs.

pub mod dto;
pub mod services;
pub mod session;

pub use services::{
    AttendanceService, EventService, ProfileService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, ServiceSettings,
};
pub use session::{
    ActionGuard, Route, SessionManager, SessionNotice, SessionRegistry, SessionSnapshot,
    Subscription,
};
