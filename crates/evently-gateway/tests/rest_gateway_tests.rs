//! REST repositories and the auth client against a scripted HTTP backend
//!
//! The backend records every request it receives and answers with the
//! replies queued by the test, in order.

use std::collections::VecDeque;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query as QueryParams, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use evently_common::BackendConfig;
use evently_core::{
    AttendeeRepository, AuthProvider, Caller, DomainError, EventPatch, EventRepository,
    ProfileRepository, UserMetadata,
};
use evently_gateway::{
    GoTrueClient, RestAttendeeRepository, RestClient, RestEventRepository, RestProfileRepository,
};

const ANON_KEY: &str = "anon-key";
const ACCESS_TOKEN: &str = "user-access-token";

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    prefer: Option<String>,
    apikey: Option<String>,
    authorization: Option<String>,
    body: Option<Value>,
}

impl Seen {
    fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Backend {
    replies: Mutex<VecDeque<(StatusCode, Value)>>,
    seen: Mutex<Vec<Seen>>,
}

async fn record(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    QueryParams(query): QueryParams<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    backend.seen.lock().push(Seen {
        method,
        path: uri.path().to_string(),
        query,
        prefer: header("prefer"),
        apikey: header("apikey"),
        authorization: header("authorization"),
        body: serde_json::from_slice(&body).ok(),
    });

    let (status, reply) = backend
        .replies
        .lock()
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "no reply queued" })));
    (status, Json(reply))
}

struct TestBackend {
    backend: Arc<Backend>,
    client: Arc<RestClient>,
}

impl TestBackend {
    async fn start() -> Self {
        let backend = Arc::new(Backend::default());
        let app = Router::new().fallback(record).with_state(backend.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let config = BackendConfig {
            url: format!("http://{addr}/"),
            anon_key: ANON_KEY.to_string(),
            timeout_seconds: 5,
        };
        Self {
            backend,
            client: Arc::new(RestClient::new(&config).unwrap()),
        }
    }

    fn reply(&self, status: StatusCode, body: Value) -> &Self {
        self.backend.replies.lock().push_back((status, body));
        self
    }

    fn seen(&self) -> Vec<Seen> {
        self.backend.seen.lock().clone()
    }
}

fn user() -> (Uuid, Caller) {
    let id = Uuid::new_v4();
    (id, Caller::user(id, ACCESS_TOKEN))
}

fn event_row(id: Uuid, organizer: Uuid, date: &str, title: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2026-10-01T10:00:00Z",
        "title": title,
        "description": "Monthly meetup for Rustaceans",
        "date": date,
        "time": "18:30",
        "location": "Berlin",
        "image_url": null,
        "status": "upcoming",
        "user_id": organizer,
    })
}

fn attendee_row(event_id: Uuid, user_id: Uuid) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "created_at": "2026-10-02T09:00:00Z",
        "event_id": event_id,
        "user_id": user_id,
    })
}

fn session_body(user_id: Uuid) -> Value {
    json!({
        "access_token": "fresh-access",
        "refresh_token": "fresh-refresh",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "user": {
            "id": user_id,
            "email": "ada@example.com",
            "user_metadata": { "first_name": "Ada", "last_name": "Lovelace" }
        }
    })
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_list_by_organizer_request_shape() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    stub.reply(
        StatusCode::OK,
        json!([
            event_row(Uuid::new_v4(), user_id, "2026-11-03", "Rust Meetup"),
            event_row(Uuid::new_v4(), user_id, "2026-12-01", "Winter Social"),
        ]),
    );

    let repo = RestEventRepository::new(stub.client.clone());
    let events = repo.list_by_organizer(&caller, user_id).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "Rust Meetup");

    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].path, "/rest/v1/events");
    assert_eq!(seen[0].param("user_id"), Some(format!("eq.{user_id}").as_str()));
    assert_eq!(seen[0].param("order"), Some("date.asc"));
    assert_eq!(seen[0].apikey.as_deref(), Some(ANON_KEY));
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Bearer {ACCESS_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_anonymous_caller_sends_anon_key_as_bearer() {
    let stub = TestBackend::start().await;
    stub.reply(StatusCode::OK, json!([]));

    let repo = RestEventRepository::new(stub.client.clone());
    assert!(repo.list(&Caller::Anonymous).await.unwrap().is_empty());

    let seen = stub.seen();
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Bearer {ANON_KEY}").as_str())
    );
}

#[tokio::test]
async fn test_update_missing_event_is_not_found() {
    let stub = TestBackend::start().await;
    let (_, caller) = user();
    let id = Uuid::new_v4();
    // PATCH touched nothing, follow-up lookup finds nothing
    stub.reply(StatusCode::OK, json!([])).reply(StatusCode::OK, json!([]));

    let repo = RestEventRepository::new(stub.client.clone());
    let patch = EventPatch {
        title: Some("Renamed".to_string()),
        ..EventPatch::default()
    };
    let err = repo.update(&caller, id, &patch).await.unwrap_err();
    assert!(matches!(err, DomainError::EventNotFound(missing) if missing == id));

    let seen = stub.seen();
    assert_eq!(seen[0].method, Method::PATCH);
    assert_eq!(seen[0].prefer.as_deref(), Some("return=representation"));
    assert_eq!(seen[0].body.as_ref().unwrap()["title"], "Renamed");
    assert_eq!(seen[1].method, Method::GET);
}

#[tokio::test]
async fn test_delete_hidden_by_policy_is_a_violation() {
    let stub = TestBackend::start().await;
    let (organizer, _) = user();
    let (_, other) = user();
    let id = Uuid::new_v4();
    // Row exists but the policy filtered it out of the DELETE
    stub.reply(StatusCode::OK, json!([]))
        .reply(StatusCode::OK, json!([event_row(id, organizer, "2026-11-03", "Rust Meetup")]));

    let repo = RestEventRepository::new(stub.client.clone());
    let err = repo.delete(&other, id).await.unwrap_err();
    assert!(matches!(err, DomainError::PolicyViolation(_)));
    assert_eq!(stub.seen()[0].method, Method::DELETE);
}

#[tokio::test]
async fn test_rest_error_codes_map_to_domain_errors() {
    let stub = TestBackend::start().await;
    let (_, caller) = user();
    stub.reply(
        StatusCode::FORBIDDEN,
        json!({ "code": "42501", "message": "new row violates row-level security policy" }),
    )
    .reply(StatusCode::NOT_FOUND, json!({ "message": "relation does not exist" }));

    let repo = RestEventRepository::new(stub.client.clone());
    assert!(matches!(
        repo.list(&caller).await.unwrap_err(),
        DomainError::PolicyViolation(_)
    ));
    assert!(matches!(
        repo.list(&caller).await.unwrap_err(),
        DomainError::BackendError(_)
    ));
}

// ============================================================================
// Attendees
// ============================================================================

#[tokio::test]
async fn test_join_sends_ignore_duplicates_upsert() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    let event_id = Uuid::new_v4();
    stub.reply(StatusCode::CREATED, json!([attendee_row(event_id, user_id)]));

    let repo = RestAttendeeRepository::new(stub.client.clone());
    let attendee = repo.join(&caller, event_id, user_id).await.unwrap();
    assert_eq!(attendee.event_id, event_id);
    assert_eq!(attendee.user_id, user_id);

    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/rest/v1/event_attendees");
    assert_eq!(seen[0].param("on_conflict"), Some("event_id,user_id"));
    assert_eq!(
        seen[0].prefer.as_deref(),
        Some("resolution=ignore-duplicates,return=representation")
    );
    let body = seen[0].body.as_ref().unwrap();
    assert_eq!(body[0]["event_id"], json!(event_id));
    assert_eq!(body[0]["user_id"], json!(user_id));
}

#[tokio::test]
async fn test_join_twice_reads_back_existing_row() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    let event_id = Uuid::new_v4();
    let existing = attendee_row(event_id, user_id);
    // Duplicate ignored: empty representation, then the lookup
    stub.reply(StatusCode::CREATED, json!([]))
        .reply(StatusCode::OK, json!([existing.clone()]));

    let repo = RestAttendeeRepository::new(stub.client.clone());
    let attendee = repo.join(&caller, event_id, user_id).await.unwrap();
    assert_eq!(json!(attendee.id), existing["id"]);

    let seen = stub.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].method, Method::GET);
    assert_eq!(seen[1].param("event_id"), Some(format!("eq.{event_id}").as_str()));
    assert_eq!(seen[1].param("user_id"), Some(format!("eq.{user_id}").as_str()));
}

#[tokio::test]
async fn test_join_conflict_without_upsert_support_is_duplicate() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    stub.reply(
        StatusCode::CONFLICT,
        json!({ "code": "23505", "message": "duplicate key value violates unique constraint" }),
    );

    let repo = RestAttendeeRepository::new(stub.client.clone());
    let err = repo.join(&caller, Uuid::new_v4(), user_id).await.unwrap_err();
    assert!(matches!(err, DomainError::DuplicateRecord(_)));
}

#[tokio::test]
async fn test_leave_counts_removed_rows() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    let event_id = Uuid::new_v4();
    stub.reply(StatusCode::OK, json!([{ "id": Uuid::new_v4() }]))
        .reply(StatusCode::OK, json!([]));

    let repo = RestAttendeeRepository::new(stub.client.clone());
    assert_eq!(repo.leave(&caller, event_id, user_id).await.unwrap(), 1);
    // Not attending any more: nothing removed, not an error
    assert_eq!(repo.leave(&caller, event_id, user_id).await.unwrap(), 0);

    let seen = stub.seen();
    assert_eq!(seen[0].method, Method::DELETE);
    assert_eq!(seen[0].param("select"), Some("id"));
    assert_eq!(seen[0].prefer.as_deref(), Some("return=representation"));
}

#[tokio::test]
async fn test_events_for_user_parses_embed_and_sorts_by_date() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    let organizer = Uuid::new_v4();
    let later = Uuid::new_v4();
    let sooner = Uuid::new_v4();

    let mut first = attendee_row(later, user_id);
    first["events"] = event_row(later, organizer, "2026-12-24", "Holiday Party");
    let mut second = attendee_row(sooner, user_id);
    second["events"] = event_row(sooner, organizer, "2026-11-03", "Rust Meetup");
    let mut orphan = attendee_row(Uuid::new_v4(), user_id);
    orphan["events"] = Value::Null;
    stub.reply(StatusCode::OK, json!([first, second, orphan]));

    let repo = RestAttendeeRepository::new(stub.client.clone());
    let events = repo.list_events_for_user(&caller, user_id).await.unwrap();

    let ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![sooner, later]);

    let seen = stub.seen();
    assert_eq!(seen[0].param("select"), Some("*,events(*)"));
    assert_eq!(seen[0].param("user_id"), Some(format!("eq.{user_id}").as_str()));
}

#[tokio::test]
async fn test_list_by_event_embeds_profiles() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    let event_id = Uuid::new_v4();
    let mut row = attendee_row(event_id, user_id);
    row["profiles"] = json!({
        "id": user_id,
        "created_at": "2026-09-01T08:00:00Z",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "avatar_url": null,
        "bio": null,
    });
    stub.reply(StatusCode::OK, json!([row]));

    let repo = RestAttendeeRepository::new(stub.client.clone());
    let attendees = repo.list_by_event(&caller, event_id).await.unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(
        attendees[0].profile.as_ref().map(|p| p.first_name.as_str()),
        Some("Ada")
    );
    assert_eq!(stub.seen()[0].param("select"), Some("*,profiles(*)"));
}

// ============================================================================
// Profiles
// ============================================================================

#[tokio::test]
async fn test_profile_find_missing_is_none() {
    let stub = TestBackend::start().await;
    let (user_id, caller) = user();
    stub.reply(StatusCode::OK, json!([]));

    let repo = RestProfileRepository::new(stub.client.clone());
    assert!(repo.find_by_id(&caller, user_id).await.unwrap().is_none());
    assert_eq!(stub.seen()[0].path, "/rest/v1/profiles");
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_sign_in_posts_password_grant() {
    let stub = TestBackend::start().await;
    let user_id = Uuid::new_v4();
    stub.reply(StatusCode::OK, session_body(user_id));

    let auth = GoTrueClient::new(stub.client.clone());
    let session = auth
        .sign_in_with_password("ada@example.com", "difference-engine")
        .await
        .unwrap();
    assert_eq!(session.user_id(), user_id);
    assert_eq!(session.expires_at, 1_900_000_000);
    assert_eq!(session.refresh_token, "fresh-refresh");

    let seen = stub.seen();
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/auth/v1/token");
    assert_eq!(seen[0].param("grant_type"), Some("password"));
    assert_eq!(seen[0].body.as_ref().unwrap()["email"], "ada@example.com");
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let stub = TestBackend::start().await;
    stub.reply(
        StatusCode::BAD_REQUEST,
        json!({ "error_code": "invalid_credentials", "msg": "Invalid login credentials" }),
    );

    let auth = GoTrueClient::new(stub.client.clone());
    let err = auth
        .sign_in_with_password("ada@example.com", "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidCredentials));
}

#[tokio::test]
async fn test_spent_refresh_token_is_session_expired() {
    let stub = TestBackend::start().await;
    stub.reply(
        StatusCode::BAD_REQUEST,
        json!({ "error": "invalid_grant", "error_description": "Invalid Refresh Token" }),
    );

    let auth = GoTrueClient::new(stub.client.clone());
    let err = auth.refresh_session("spent").await.unwrap_err();
    assert!(matches!(err, DomainError::SessionExpired));
    assert_eq!(stub.seen()[0].param("grant_type"), Some("refresh_token"));
}

#[tokio::test]
async fn test_sign_up_awaiting_confirmation_has_no_session() {
    let stub = TestBackend::start().await;
    let user_id = Uuid::new_v4();
    stub.reply(
        StatusCode::OK,
        json!({
            "id": user_id,
            "email": "ada@example.com",
            "user_metadata": { "first_name": "Ada", "last_name": "Lovelace" }
        }),
    );

    let auth = GoTrueClient::new(stub.client.clone());
    let outcome = auth
        .sign_up(
            "ada@example.com",
            "difference-engine",
            &UserMetadata::new("Ada", "Lovelace"),
        )
        .await
        .unwrap();
    assert!(outcome.session.is_none());
    assert_eq!(outcome.identity.id, user_id);

    let seen = stub.seen();
    assert_eq!(seen[0].path, "/auth/v1/signup");
    assert_eq!(seen[0].body.as_ref().unwrap()["data"]["first_name"], "Ada");
}

#[tokio::test]
async fn test_password_reset_carries_redirect() {
    let stub = TestBackend::start().await;
    stub.reply(StatusCode::OK, json!({}));

    let auth = GoTrueClient::new(stub.client.clone());
    auth.reset_password_for_email("ada@example.com", "https://evently.test/reset-password")
        .await
        .unwrap();

    let seen = stub.seen();
    assert_eq!(seen[0].path, "/auth/v1/recover");
    assert_eq!(
        seen[0].param("redirect_to"),
        Some("https://evently.test/reset-password")
    );
}
