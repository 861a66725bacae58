//! API Integration Tests
//!
//! Every test spawns the HTTP server over the in-process backend, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use evently_core::AuthProvider;
use evently_gateway::MemoryOptions;
use integration_tests::{assert_json, assert_status, fixtures::*, Browser, TestServer, SITE_URL};
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

/// Sign a fresh user up in a new browser
async fn signed_up(server: &TestServer, first_name: &str) -> (Browser, SignUpForm) {
    let browser = server.browser().expect("Failed to create browser");
    let form = SignUpForm::unique(first_name);
    let response = browser.post("/auth/sign-up", &form).await.unwrap();
    let body: RedirectBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.redirect, "/dashboard");
    (browser, form)
}

async fn create_event(browser: &Browser, form: &EventForm) -> EventBody {
    let response = browser.post("/events", form).await.unwrap();
    let body: Data<EventBody> = assert_json(response, StatusCode::CREATED).await.unwrap();
    body.data
}

async fn current_user(browser: &Browser) -> Option<ProfileBody> {
    let response = browser.get("/session").await.unwrap();
    let body: Data<SessionBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!body.data.loading);
    body.data.user
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_sign_up_signs_the_browser_in() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, form) = signed_up(&server, "Grace").await;

    let user = current_user(&browser).await.expect("signed in");
    assert_eq!(user.email, form.email);
    assert_eq!(user.full_name, "Grace Tester");

    // Another browser is unaffected
    let other = server.browser().unwrap();
    assert!(current_user(&other).await.is_none());
}

#[tokio::test]
async fn test_sign_in_with_wrong_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, form) = signed_up(&server, "Alan").await;

    let browser = server.browser().unwrap();
    let response = browser
        .post(
            "/auth/sign-in",
            &SignInForm {
                email: form.email.clone(),
                password: "not-the-password".to_string(),
            },
        )
        .await
        .unwrap();

    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_CREDENTIALS");
    assert_eq!(body.error.redirect.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_sign_in_and_sign_out() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, form) = signed_up(&server, "Edsger").await;

    let browser = server.browser().unwrap();
    let response = browser.post("/auth/sign-in", &form.sign_in()).await.unwrap();
    let body: RedirectBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.redirect, "/dashboard");
    assert!(current_user(&browser).await.is_some());

    let response = browser.post_empty("/auth/sign-out").await.unwrap();
    let body: RedirectBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.redirect, "/");

    assert!(current_user(&browser).await.is_none());
    let response = browser.get("/events").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_sign_up_with_email_confirmation() {
    let server = TestServer::start_with_options(MemoryOptions {
        require_email_confirmation: true,
        ..MemoryOptions::default()
    })
    .await
    .expect("Failed to start server");

    let browser = server.browser().unwrap();
    let form = SignUpForm::unique("Barbara");
    let response = browser.post("/auth/sign-up", &form).await.unwrap();
    let body: RedirectBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.redirect, "/login");
    assert!(body.message.unwrap().contains("confirm"));
    assert!(current_user(&browser).await.is_none());

    let response = browser.post("/auth/sign-in", &form.sign_in()).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "EMAIL_NOT_CONFIRMED");

    assert!(server.backend.confirm_email(&form.email).await);
    let response = browser.post("/auth/sign-in", &form.sign_in()).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // The profile is created on first sign-in from the sign-up metadata
    let user = current_user(&browser).await.expect("signed in");
    assert_eq!(user.first_name, "Barbara");
    assert_eq!(user.last_name, "Tester");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, form) = signed_up(&server, "Donald").await;

    let browser = server.browser().unwrap();
    let response = browser
        .post("/auth/forgot-password", &json!({ "email": form.email }))
        .await
        .unwrap();
    let body: MessageBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.message.contains("reset"));

    let emails = server.backend.recovery_emails().await;
    assert_eq!(
        emails,
        vec![(form.email.to_lowercase(), format!("{SITE_URL}/reset-password"))]
    );

    // The recovery link carries a session for the account
    let link_session = server
        .backend
        .sign_in_with_password(&form.email, &form.password)
        .await
        .unwrap();

    let response = browser
        .post(
            "/auth/reset-password",
            &json!({
                "password": "brand-new-secret",
                "confirm_password": "brand-new-secret",
                "recovery": {
                    "access_token": link_session.access_token,
                    "refresh_token": link_session.refresh_token,
                },
            }),
        )
        .await
        .unwrap();
    let body: RedirectBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.redirect, "/login");

    let fresh = server.browser().unwrap();
    let response = fresh.post("/auth/sign-in", &form.sign_in()).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = fresh
        .post(
            "/auth/sign-in",
            &SignInForm {
                email: form.email.clone(),
                password: "brand-new-secret".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_reset_password_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let browser = server.browser().unwrap();

    let response = browser
        .post(
            "/auth/reset-password",
            &json!({ "password": "brand-new-secret", "confirm_password": "different-secret" }),
        )
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(body.error.details.unwrap().get("confirm_password").is_some());

    // Without a recovery link or a session there is nobody to update
    let response = browser
        .post(
            "/auth/reset-password",
            &json!({ "password": "brand-new-secret", "confirm_password": "brand-new-secret" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_create_then_fetch_event() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, _) = signed_up(&server, "Margaret").await;

    let form = EventForm {
        image_url: Some("https://images.example.com/apollo.png".to_string()),
        ..EventForm::unique()
    };
    let created = create_event(&browser, &form).await;
    assert_eq!(created.title, form.title);
    assert_eq!(created.status, "upcoming");
    assert!(!created.created_at.is_empty());

    let response = browser.get(&format!("/events/{}", created.id)).await.unwrap();
    let details: Data<EventDetailsBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let details = details.data;

    assert_eq!(details.event.id, created.id);
    assert_eq!(details.event.description, form.description);
    assert_eq!(details.event.date, form.date);
    assert_eq!(details.event.time, form.time);
    assert_eq!(details.event.location, form.location);
    assert_eq!(details.event.image_url, form.image_url);
    assert!(details.is_organizer);
    assert!(!details.is_attending);
    assert_eq!(details.attendee_count, 0);
    assert_eq!(details.organizer.unwrap().first_name, "Margaret");
    assert_eq!(
        details.share_url,
        format!("{SITE_URL}/dashboard/events/{}", created.id)
    );
}

#[tokio::test]
async fn test_create_event_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, _) = signed_up(&server, "Frances").await;

    let form = EventForm {
        title: "ab".to_string(),
        image_url: Some("not a url".to_string()),
        ..EventForm::unique()
    };
    let response = browser.post("/events", &form).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    let details = body.error.details.unwrap();
    assert!(details.get("title").is_some());
    assert!(details.get("image_url").is_some());
    assert!(details.get("location").is_none());
}

#[tokio::test]
async fn test_non_organizer_cannot_edit_or_delete() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (organizer, _) = signed_up(&server, "Anita").await;
    let (guest, _) = signed_up(&server, "Bob").await;

    let event = create_event(&organizer, &EventForm::unique()).await;

    let response = guest.get(&format!("/events/{}", event.id)).await.unwrap();
    let details: Data<EventDetailsBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!details.data.is_organizer);
    assert_eq!(details.data.organizer.unwrap().first_name, "Anita");

    let response = guest.get(&format!("/events/{}/edit", event.id)).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_ORGANIZER");
    assert_eq!(
        body.error.redirect,
        Some(format!("/dashboard/events/{}", event.id))
    );

    let response = guest
        .patch(&format!("/events/{}", event.id), &json!({ "title": "Hijacked" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = guest
        .delete(&format!("/events/{}?confirm=true", event.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Untouched
    let response = organizer.get(&format!("/events/{}/edit", event.id)).await.unwrap();
    let body: Data<EventBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.title, event.title);
}

#[tokio::test]
async fn test_update_event_returns_stored_event() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, _) = signed_up(&server, "Katherine").await;
    let event = create_event(
        &browser,
        &EventForm {
            image_url: Some("https://images.example.com/old.png".to_string()),
            ..EventForm::unique()
        },
    )
    .await;

    let response = browser
        .patch(
            &format!("/events/{}", event.id),
            &json!({ "location": "Main Library", "status": "ongoing", "image_url": "" }),
        )
        .await
        .unwrap();
    let body: Data<EventBody> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body.data.location, "Main Library");
    assert_eq!(body.data.status, "ongoing");
    assert_eq!(body.data.image_url, None);
    assert_eq!(body.data.title, event.title);
}

#[tokio::test]
async fn test_delete_event_cascades_attendees() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (organizer, _) = signed_up(&server, "Radia").await;
    let (guest, _) = signed_up(&server, "Vint").await;

    let event = create_event(&organizer, &EventForm::unique()).await;
    let response = guest
        .post_empty(&format!("/events/{}/attendees", event.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(server.backend.total_attendee_rows().await, 1);

    let response = organizer
        .delete(&format!("/events/{}?confirm=true", event.id))
        .await
        .unwrap();
    let body: RedirectBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.redirect, "/dashboard/my-events");

    assert_eq!(server.backend.total_attendee_rows().await, 0);
    let response = organizer.get("/events?view=all").await.unwrap();
    let list: EventListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(list.events.iter().all(|e| e.id != event.id));

    let response = guest.get(&format!("/events/{}", event.id)).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.redirect.as_deref(), Some("/dashboard"));
}

// ============================================================================
// Attendance Tests
// ============================================================================

#[tokio::test]
async fn test_join_twice_leaves_one_row() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (organizer, _) = signed_up(&server, "Ida").await;
    let (guest, _) = signed_up(&server, "Ken").await;
    let event = create_event(&organizer, &EventForm::unique()).await;
    let path = format!("/events/{}/attendees", event.id);

    for _ in 0..2 {
        let response = guest.post_empty(&path).await.unwrap();
        let body: Data<AttendanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(body.data.is_attending);
        assert_eq!(body.data.attendee_count, 1);
        assert_eq!(
            body.data.attendees[0].profile.as_ref().unwrap().first_name,
            "Ken"
        );
    }

    let guest_id: Uuid = current_user(&guest).await.unwrap().id.parse().unwrap();
    let event_id: Uuid = event.id.parse().unwrap();
    assert_eq!(server.backend.attendee_rows(event_id, guest_id).await, 1);

    let response = guest.get("/me/attending").await.unwrap();
    let list: EventListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.events[0].id, event.id);

    // The organizer sees the attendee on the detail page
    let response = organizer.get(&format!("/events/{}", event.id)).await.unwrap();
    let details: Data<EventDetailsBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(details.data.attendee_count, 1);
    assert!(!details.data.is_attending);
}

#[tokio::test]
async fn test_leave_requires_confirmation_and_is_idempotent() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (organizer, _) = signed_up(&server, "Lynn").await;
    let (guest, _) = signed_up(&server, "Niklaus").await;
    let event = create_event(&organizer, &EventForm::unique()).await;
    let path = format!("/events/{}/attendees", event.id);

    let response = guest.post_empty(&path).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = guest.delete(&path).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::PRECONDITION_REQUIRED)
        .await
        .unwrap();
    assert_eq!(body.error.code, "CONFIRMATION_REQUIRED");

    for _ in 0..2 {
        let response = guest.delete(&format!("{path}?confirm=true")).await.unwrap();
        let body: Data<AttendanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(!body.data.is_attending);
        assert_eq!(body.data.attendee_count, 0);
    }
}

#[tokio::test]
async fn test_join_missing_event() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, _) = signed_up(&server, "John").await;

    let response = browser
        .post_empty(&format!("/events/{}/attendees", Uuid::new_v4()))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_EVENT");
    assert_eq!(server.backend.total_attendee_rows().await, 0);
}

// ============================================================================
// My Events / Profile Tests
// ============================================================================

#[tokio::test]
async fn test_my_events_ordered_and_searchable() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (mine, _) = signed_up(&server, "Sophie").await;
    let (other, _) = signed_up(&server, "Tim").await;

    let late = create_event(&mine, &EventForm::unique().on("2026-12-24")).await;
    let early = create_event(
        &mine,
        &EventForm {
            location: "Harbour Pavilion".to_string(),
            ..EventForm::unique().on("2026-10-31")
        },
    )
    .await;
    create_event(&other, &EventForm::unique()).await;

    let response = mine.get("/me/events").await.unwrap();
    let list: EventListBody = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<&str> = list.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![early.id.as_str(), late.id.as_str()]);
    assert!(list.error.is_none());

    let response = mine.get("/me/events?q=HARBOUR").await.unwrap();
    let list: EventListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.events[0].id, early.id);

    let response = mine.get("/me/events?q=%20%20").await.unwrap();
    let list: EventListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.total, 2);

    // The dashboard shows everyone's upcoming events
    let response = mine.get("/events").await.unwrap();
    let list: EventListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.total, 3);
}

#[tokio::test]
async fn test_profile_update_republishes_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, form) = signed_up(&server, "Hedy").await;

    let response = browser
        .patch(
            "/me/profile",
            &json!({
                "first_name": "Hedwig",
                "last_name": "Kiesler",
                "avatar_url": "https://images.example.com/hedy.png",
                "bio": "Inventor",
            }),
        )
        .await
        .unwrap();
    let body: Data<ProfileBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.full_name, "Hedwig Kiesler");
    assert_eq!(body.data.bio.as_deref(), Some("Inventor"));
    assert_eq!(body.data.email, form.email);

    let user = current_user(&browser).await.unwrap();
    assert_eq!(user.first_name, "Hedwig");

    // Blank optional fields clear the stored values
    let response = browser
        .patch(
            "/me/profile",
            &json!({ "first_name": "Hedwig", "last_name": "Kiesler", "avatar_url": "", "bio": "" }),
        )
        .await
        .unwrap();
    let body: Data<ProfileBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.data.avatar_url.is_none());
    assert!(body.data.bio.is_none());

    let response = browser.get("/me/profile").await.unwrap();
    let body: Data<ProfileBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.data.bio.is_none());
}

// ============================================================================
// Session Stream Tests
// ============================================================================

#[tokio::test]
async fn test_session_stream_announces_changes() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, _) = signed_up(&server, "Mary").await;

    let mut stream = browser.get("/session/stream").await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    let response = browser
        .patch(
            "/me/profile",
            &json!({ "first_name": "Maryam", "last_name": "Tester" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let received = tokio::time::timeout(Duration::from_secs(5), async {
        let mut text = String::new();
        while let Some(chunk) = stream.chunk().await.unwrap() {
            text.push_str(&String::from_utf8_lossy(&chunk));
            if text.contains("\n\n") {
                break;
            }
        }
        text
    })
    .await
    .expect("no session event");

    assert!(received.contains("event: user_updated"));
    assert!(received.contains("Maryam"));
}
