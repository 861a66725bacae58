//! Session handlers
//!
//! The current user, and a server-sent-events stream telling the page to
//! re-fetch whenever the session changes.

use std::convert::Infallible;

use axum::{
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    Json,
};
use futures::{stream, Stream};
use tokio::sync::mpsc;

use evently_service::dto::{ApiResponse, ProfileResponse, SessionResponse};
use evently_service::SessionNotice;

use crate::extractors::{CurrentSession, SignedIn};
use crate::response::{ApiResult, NoContent};

/// Current user of this browser
///
/// GET /session
pub async fn get_session(session: CurrentSession) -> Json<ApiResponse<SessionResponse>> {
    let snapshot = session.manager.wait_ready().await;
    Json(ApiResponse::new(SessionResponse {
        user: snapshot.user.as_ref().map(ProfileResponse::from),
        loading: snapshot.loading,
    }))
}

/// Refresh the access token now
///
/// POST /session/refresh
pub async fn refresh_session(session: SignedIn) -> ApiResult<NoContent> {
    session.manager.refresh_session().await?;
    Ok(NoContent)
}

/// Session change notifications
///
/// GET /session/stream
///
/// The listener stays registered for as long as the stream is open.
pub async fn session_stream(
    session: CurrentSession,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel::<SessionNotice>();
    let subscription = session.manager.subscribe(move |notice| {
        let _ = tx.send(notice.clone());
    });

    // Holding the manager keeps it from being pruned while the page is open
    let state = (rx, subscription, session.manager);
    let events = stream::unfold(state, |(mut rx, subscription, manager)| async move {
        let notice = rx.recv().await?;
        Some((Ok(to_sse_event(&notice)), (rx, subscription, manager)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse_event(notice: &SessionNotice) -> SseEvent {
    let name = serde_json::to_value(notice.event)
        .ok()
        .and_then(|v| v.as_str().map(str::to_lowercase))
        .unwrap_or_else(|| "session".to_string());

    SseEvent::default()
        .event(name)
        .json_data(notice)
        .unwrap_or_else(|_| SseEvent::default().data("refresh"))
}
