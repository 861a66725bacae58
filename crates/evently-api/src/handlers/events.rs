//! Event handlers
//!
//! Dashboard, create, detail, edit, and delete pages.

use axum::{extract::State, Json};
use evently_service::dto::{
    ApiResponse, CreateEventRequest, EventDetailsResponse, EventListQuery, EventListResponse,
    EventResponse, RedirectResponse, UpdateEventRequest,
};
use evently_service::{EventService, Route, ServiceError};
use uuid::Uuid;

use crate::extractors::{Confirmed, EventIdPath, ListQuery, SignedIn, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Errors on an event page send the browser somewhere sensible: back to the
/// dashboard for a missing event, to the event itself for a non-organizer.
fn page_error(error: ServiceError, event_id: Uuid) -> ApiError {
    if error.is_not_found() {
        ApiError::from(error).redirect_to(Route::Dashboard)
    } else if error.is_forbidden() {
        ApiError::from(error).redirect_to(Route::Event(event_id))
    } else {
        ApiError::from(error)
    }
}

/// Dashboard event list
///
/// GET /events?q=&view=upcoming|all
pub async fn list_events(
    State(state): State<AppState>,
    session: SignedIn,
    ListQuery(query): ListQuery<EventListQuery>,
) -> Json<EventListResponse> {
    let service = EventService::new(state.service_context());
    Json(service.list_events(&session.caller, &query).await)
}

/// Create an event organized by the signed-in user
///
/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    session: SignedIn,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Created<Json<ApiResponse<EventResponse>>>> {
    let _guard = session.manager.begin("create-event")?;
    let service = EventService::new(state.service_context());
    let event = service.create_event(&session.caller, request).await?;
    Ok(Created(Json(ApiResponse::new(event))))
}

/// Event detail page
///
/// GET /events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    session: SignedIn,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<Json<ApiResponse<EventDetailsResponse>>> {
    let service = EventService::new(state.service_context());
    let details = service
        .get_event_details(&session.caller, event_id)
        .await
        .map_err(|e| page_error(e, event_id))?;
    Ok(Json(ApiResponse::new(details)))
}

/// Event as loaded into the edit form
///
/// GET /events/{event_id}/edit
pub async fn edit_event(
    State(state): State<AppState>,
    session: SignedIn,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<Json<ApiResponse<EventResponse>>> {
    let service = EventService::new(state.service_context());
    let event = service
        .get_event_for_edit(&session.caller, event_id)
        .await
        .map_err(|e| page_error(e, event_id))?;
    Ok(Json(ApiResponse::new(event)))
}

/// Save the edit form
///
/// PATCH /events/{event_id}
pub async fn update_event(
    State(state): State<AppState>,
    session: SignedIn,
    EventIdPath(event_id): EventIdPath,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> ApiResult<Json<ApiResponse<EventResponse>>> {
    let _guard = session.manager.begin(format!("update-event:{event_id}"))?;
    let service = EventService::new(state.service_context());
    let event = service
        .update_event(&session.caller, event_id, request)
        .await
        .map_err(|e| page_error(e, event_id))?;
    Ok(Json(ApiResponse::new(event)))
}

/// Delete an event after confirmation
///
/// DELETE /events/{event_id}?confirm=true
pub async fn delete_event(
    State(state): State<AppState>,
    session: SignedIn,
    EventIdPath(event_id): EventIdPath,
    _confirmed: Confirmed,
) -> ApiResult<Json<RedirectResponse>> {
    let _guard = session.manager.begin(format!("delete-event:{event_id}"))?;
    let service = EventService::new(state.service_context());
    let route = service
        .delete_event(&session.caller, event_id)
        .await
        .map_err(|e| page_error(e, event_id))?;
    Ok(Json(
        RedirectResponse::to(route.path()).with_message("Event deleted successfully."),
    ))
}
