//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for form inputs
//! - Response DTOs for serializing API outputs
//! - Mappers between domain entities and DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateEventRequest, EventListQuery, ForgotPasswordRequest, RecoveryTokens,
    ResetPasswordRequest, SearchQuery, SignInRequest, SignUpRequest, UpdateEventRequest,
    UpdateProfileRequest,
};

pub use responses::{
    ApiResponse, AttendanceResponse, AttendeeResponse, EventDetailsResponse, EventListResponse,
    EventResponse, HealthResponse, MessageResponse, ProfileResponse, ReadinessResponse,
    RedirectResponse, SessionResponse,
};
