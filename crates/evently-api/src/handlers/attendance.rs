//! Attendance handlers
//!
//! Join and leave buttons on the event detail page. Both answer with the
//! re-fetched attendee list.

use axum::{extract::State, Json};
use evently_service::dto::{ApiResponse, AttendanceResponse};
use evently_service::AttendanceService;

use crate::extractors::{Confirmed, EventIdPath, SignedIn};
use crate::response::ApiResult;
use crate::state::AppState;

/// Join an event
///
/// POST /events/{event_id}/attendees
pub async fn join_event(
    State(state): State<AppState>,
    session: SignedIn,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<Json<ApiResponse<AttendanceResponse>>> {
    let _guard = session.manager.begin(format!("attendance:{event_id}"))?;
    let service = AttendanceService::new(state.service_context());
    let attendance = service.join_event(&session.caller, event_id).await?;
    Ok(Json(ApiResponse::new(attendance)))
}

/// Leave an event after confirmation
///
/// DELETE /events/{event_id}/attendees?confirm=true
pub async fn leave_event(
    State(state): State<AppState>,
    session: SignedIn,
    EventIdPath(event_id): EventIdPath,
    _confirmed: Confirmed,
) -> ApiResult<Json<ApiResponse<AttendanceResponse>>> {
    let _guard = session.manager.begin(format!("attendance:{event_id}"))?;
    let service = AttendanceService::new(state.service_context());
    let attendance = service.leave_event(&session.caller, event_id).await?;
    Ok(Json(ApiResponse::new(attendance)))
}
