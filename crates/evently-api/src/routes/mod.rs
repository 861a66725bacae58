//! Route definitions
//!
//! All page endpoints are mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{attendance, auth, events, health, me, session};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1", api_v1_routes())
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(session_routes())
        .merge(event_routes())
        .merge(me_routes())
}

/// Sign in, sign up, and password recovery
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(session::get_session))
        .route("/session/refresh", post(session::refresh_session))
        .route("/session/stream", get(session::session_stream))
}

/// Event pages
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:event_id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:event_id/edit", get(events::edit_event))
        .route(
            "/events/:event_id/attendees",
            post(attendance::join_event).delete(attendance::leave_event),
        )
}

/// Pages about the signed-in user
fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me/events", get(me::my_events))
        .route("/me/attending", get(me::attending))
        .route("/me/profile", get(me::get_profile).patch(me::update_profile))
}
