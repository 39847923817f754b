//! Mock server tests for the Immortal client.
//!
//! These use wiremock to simulate the backing API and exercise the
//! client's auth behavior without network access or real credentials.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use immortal_client::{ApiClient, ApiSession, FilePart, SessionState};
use immortal_core::{AccessToken, ApiUrl, Credentials, Error, RegisterPayload, UserProfile};

/// Helper to create a base URL from a mock server.
fn mock_api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn mock_session(server: &MockServer) -> ApiSession {
    ApiSession::new(ApiClient::new(mock_api_url(server)))
}

fn user_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "full_name": "Ada Lovelace",
        "email": "ada@example.com",
        "intent": "myself",
        "created_at": "2026-01-12T09:30:00Z"
    })
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn login_stores_token_and_fetches_identity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "secret123",
            "remember": true
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-1", "token_type": "bearer"}))
                .insert_header("set-cookie", "refresh=rt-1; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("u-1")))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let user = session
        .login(Credentials::new("ada@example.com", "secret123"))
        .await
        .unwrap();

    assert_eq!(user.id, "u-1");
    assert!(session.is_authenticated());
    assert_eq!(session.client().tokens().get().unwrap().as_str(), "tok-1");
}

#[tokio::test]
async fn login_failure_propagates_and_stays_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;

    // The 401 makes the client try a silent refresh before giving up.
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "No cookie"})))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let err = session
        .login(Credentials::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message("Login failed"),
        "Incorrect email or password"
    );
    assert!(!session.is_authenticated());
    assert!(session.client().tokens().get().is_none());
}

#[tokio::test]
async fn register_logs_straight_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "secret123",
            "confirm_password": "secret123",
            "intent": "myself",
            "consent": true
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"access_token": "tok-new", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("u-new")))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let user = session
        .register(RegisterPayload {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret123".to_string(),
            confirm_password: "secret123".to_string(),
            intent: "myself".to_string(),
            consent: true,
        })
        .await
        .unwrap();

    assert_eq!(user.id, "u-new");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn register_validation_error_extracts_first_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "Invalid email"},
                {"loc": ["body", "password"], "msg": "Too short"}
            ]
        })))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let err = session
        .register(RegisterPayload {
            full_name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "x".to_string(),
            confirm_password: "x".to_string(),
            intent: "myself".to_string(),
            consent: true,
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message("Registration failed"), "Invalid email");
}

// ============================================================================
// Session restore
// ============================================================================

#[tokio::test]
async fn restore_succeeds_with_valid_refresh_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-r"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-r"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("u-r")))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    assert!(matches!(session.state(), SessionState::Restoring));

    let user = session.restore().await;

    assert_eq!(user.unwrap().id, "u-r");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn restore_without_cookie_lands_unauthenticated_silently() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})),
        )
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let user = session.restore().await;

    assert!(user.is_none());
    assert!(matches!(session.state(), SessionState::Unauthenticated));
    assert!(session.client().tokens().get().is_none());
}

#[tokio::test]
async fn restore_treats_identity_failure_as_no_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-r"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let user = session.restore().await;

    assert!(user.is_none());
    assert!(matches!(session.state(), SessionState::Unauthenticated));
}

#[tokio::test]
async fn refresh_sends_the_cookie_set_at_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-1", "token_type": "bearer"}))
                .insert_header("set-cookie", "refresh=rt-42; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("u-1")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(header("cookie", "refresh=rt-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = mock_session(&server);
    session
        .login(Credentials::new("ada@example.com", "secret123"))
        .await
        .unwrap();

    assert!(session.client().refresh().await);
    assert_eq!(session.client().tokens().get().unwrap().as_str(), "tok-2");
}

// ============================================================================
// 401 recovery protocol
// ============================================================================

#[tokio::test]
async fn concurrent_401s_coalesce_into_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/traits"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Expired"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/traits"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(4)
        .mount(&server)
        .await;

    // Slow refresh so every caller's 401 arrives while it is in flight.
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "fresh"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = mock_session(&server);
    session.client().tokens().set(AccessToken::new("stale"));

    let (a, b, c, d) = tokio::join!(
        session.traits(),
        session.traits(),
        session.traits(),
        session.traits()
    );

    assert!(a.unwrap().is_empty());
    assert!(b.unwrap().is_empty());
    assert!(c.unwrap().is_empty());
    assert!(d.unwrap().is_empty());
    assert_eq!(session.client().tokens().get().unwrap().as_str(), "fresh");
}

#[tokio::test]
async fn refresh_endpoint_401_does_not_recurse() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "No cookie"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(mock_api_url(&server));
    let err = client.post_no_body("/api/auth/refresh").await.unwrap_err();

    match err {
        Error::Api(api) => assert!(api.is_unauthorized()),
        other => panic!("expected api error, got {other}"),
    }
}

#[tokio::test]
async fn replay_is_attempted_exactly_once() {
    let server = MockServer::start().await;

    // The endpoint rejects even the refreshed token.
    Mock::given(method("GET"))
        .and(path("/api/traits"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Expired"})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = mock_session(&server);
    session.client().tokens().set(AccessToken::new("stale"));

    let err = session.traits().await.unwrap_err();
    match err {
        Error::Api(api) => assert!(api.is_unauthorized()),
        other => panic!("expected api error, got {other}"),
    }
}

#[tokio::test]
async fn failed_refresh_surfaces_the_original_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/traits"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Session expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "No cookie"})))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    session.client().tokens().set(AccessToken::new("stale"));

    let err = session.traits().await.unwrap_err();
    assert_eq!(err.user_message("Request failed"), "Session expired");
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn logout_clears_state_even_when_the_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-1", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("u-1")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    session
        .login(Credentials::new("ada@example.com", "secret123"))
        .await
        .unwrap();
    assert!(session.is_authenticated());

    session.logout().await;

    assert!(!session.is_authenticated());
    assert!(session.client().tokens().get().is_none());
}

// ============================================================================
// Content operations
// ============================================================================

#[tokio::test]
async fn profile_update_sends_explicit_nulls() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/me"))
        .and(body_json(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "date_of_birth": null,
            "place_of_birth": null,
            "personal_statement": "I was here.",
            "remember_statement": null
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let profile = UserProfile {
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        personal_statement: Some("I was here.".to_string()),
        ..Default::default()
    };

    session.update_profile(&profile).await.unwrap();
}

#[tokio::test]
async fn missing_health_stats_map_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health/stats"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No stats yet"})))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    assert!(session.health_stats().await.unwrap().is_none());
}

#[tokio::test]
async fn health_stats_errors_other_than_404_propagate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = mock_session(&server);
    assert!(session.health_stats().await.is_err());
}

#[tokio::test]
async fn photo_upload_uses_transport_multipart_boundary() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/photos"))
        .and(header_regex("content-type", "multipart/form-data; boundary=.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "p-1", "file_path": "/uploads/p-1.jpg", "original_filename": "cat.jpg"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let photos = session
        .upload_photos(vec![
            FilePart::new("cat.jpg", vec![0xFF, 0xD8, 0xFF]).with_mime("image/jpeg"),
        ])
        .await
        .unwrap();

    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].original_filename, "cat.jpg");
}

// ============================================================================
// Error normalization
// ============================================================================

#[tokio::test]
async fn non_json_error_body_is_synthesized_from_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/traits"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_string("upstream unavailable")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let session = mock_session(&server);
    let err = session.traits().await.unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 503);
            assert_eq!(api.detail().as_deref(), Some("Service Unavailable"));
        }
        other => panic!("expected api error, got {other}"),
    }
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Nothing listens on this port.
    let client = ApiClient::new(ApiUrl::new("http://127.0.0.1:1").unwrap());
    let err = client.get::<serde_json::Value>("/api/traits").await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.user_message("Request failed"), "Request failed");
}
