//! Pages about the signed-in user
//!
//! My events, attending, and profile.

use axum::{extract::State, Json};
use evently_service::dto::{
    ApiResponse, EventListResponse, ProfileResponse, SearchQuery, UpdateProfileRequest,
};
use evently_service::{AttendanceService, EventService, ProfileService};

use crate::extractors::{ListQuery, SignedIn, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Events organized by the signed-in user
///
/// GET /me/events?q=
pub async fn my_events(
    State(state): State<AppState>,
    session: SignedIn,
    ListQuery(query): ListQuery<SearchQuery>,
) -> ApiResult<Json<EventListResponse>> {
    let service = EventService::new(state.service_context());
    Ok(Json(service.my_events(&session.caller, &query).await?))
}

/// Events the signed-in user attends
///
/// GET /me/attending?q=
pub async fn attending(
    State(state): State<AppState>,
    session: SignedIn,
    ListQuery(query): ListQuery<SearchQuery>,
) -> ApiResult<Json<EventListResponse>> {
    let service = AttendanceService::new(state.service_context());
    Ok(Json(service.attending_events(&session.caller, &query).await?))
}

/// Profile page
///
/// GET /me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    session: SignedIn,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let service = ProfileService::new(state.service_context());
    let profile = service.get_profile(&session.caller).await?;
    Ok(Json(ApiResponse::new(ProfileResponse::from(profile))))
}

/// Save the profile form
///
/// PATCH /me/profile
///
/// The header shows the user's name and avatar, so the session republishes
/// the updated profile.
pub async fn update_profile(
    State(state): State<AppState>,
    session: SignedIn,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let _guard = session.manager.begin("update-profile")?;
    let service = ProfileService::new(state.service_context());
    let profile = service.update_profile(&session.caller, request).await?;

    let response = ProfileResponse::from(&profile);
    session.manager.profile_updated(profile).await;
    Ok(Json(ApiResponse::new(response)))
}
