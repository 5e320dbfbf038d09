//! Integration tests for the StudyCards Server API
//!
//! These tests verify the complete request/response cycle for all endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use studycards_server::generator::{ContentGenerator, GenerationError};
use studycards_server::{open_database, AppState, Config, Db};

// Test configuration constants
const TEST_JWT_SECRET: &str = "test-jwt-secret";
const TEST_PEPPER: &str = "test-pepper";
const TEST_PASSWORD: &str = "secret123";

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,                // Random port
        database_path: "".to_string(), // Will be set per test
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_secs: 3600,
        password_pepper: TEST_PEPPER.to_string(),
        gemini_api_key: None,
        gemini_model: "test-model".to_string(),
        generator_timeout_secs: 1,
        log_requests: false,
    }
}

/// Prefixes definitions with the requested style; any definition containing
/// "FAIL" is rejected so the fallback path can be exercised
struct StubGenerator;

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate(&self, definition: &str, content_type: &str) -> Result<String, GenerationError> {
        if definition.contains("FAIL") {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(format!("[{}] {}", content_type, definition))
    }
}

/// Create a test database in a temporary directory
fn create_test_db(temp_dir: &TempDir) -> Db {
    open_database(temp_dir.path().join("test.db")).expect("Failed to create test database")
}

/// Create a test app router
fn create_test_app(db: Db) -> Router {
    let state = AppState::new(db, test_config(), Arc::new(StubGenerator));
    studycards_server::app(state)
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a request, optionally authenticated and with a JSON body
fn make_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request to a fresh router over the shared database
async fn send(db: &Db, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_test_app(db.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Register and log in a user, returning the token
async fn setup_user(db: &Db, email: &str) -> String {
    let (status, _) = send(
        db,
        make_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": "Test User", "email": email, "password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        db,
        make_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Create a set and return the response body
async fn create_set(db: &Db, token: &str, body: Value) -> Value {
    let (status, body) = send(
        db,
        make_request("POST", "/api/flashcards/sets", Some(token), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check_returns_healthy() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let app = create_test_app(db);

    let response = app
        .oneshot(make_request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["generator"], "disabled");
    assert!(body["version"].as_str().is_some());
}

// =============================================================================
// Registration & Login Tests
// =============================================================================

#[tokio::test]
async fn test_register_user_success() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);

    let (status, body) = send(
        &db,
        make_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": TEST_PASSWORD })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_register_duplicate_email_returns_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    setup_user(&db, "ada@example.com").await;

    // Emails are case-insensitive
    let (status, body) = send(
        &db,
        make_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": "Other", "email": "ADA@example.com", "password": TEST_PASSWORD })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_register_invalid_input() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);

    let cases = [
        json!({ "name": "", "email": "a@example.com", "password": TEST_PASSWORD }),
        json!({ "name": "Ada", "email": "not-an-email", "password": TEST_PASSWORD }),
        json!({ "name": "Ada", "email": "a@example.com", "password": "123" }),
    ];

    for case in cases {
        let (status, body) = send(
            &db,
            make_request("POST", "/api/auth/register", None, Some(case)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    setup_user(&db, "ada@example.com").await;

    let (status, body) = send(
        &db,
        make_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);

    let (status, _) = send(
        &db,
        make_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": TEST_PASSWORD })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);

    let (status, _) = send(&db, make_request("GET", "/api/auth/me", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &db,
        make_request("GET", "/api/flashcards/sets", Some("garbage"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_legacy_token_header_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let request = Request::builder()
        .uri("/api/auth/me")
        .header("x-auth-token", &token)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&db, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");
}

// =============================================================================
// Profile & Streak Tests
// =============================================================================

#[tokio::test]
async fn test_me_returns_profile_and_logs_activity() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let (status, body) = send(&db, make_request("GET", "/api/auth/me", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["streak"], 1);
    assert_eq!(body["activeDays"].as_array().unwrap().len(), 1);
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_streak_is_idempotent_within_a_day() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let (_, first) = send(&db, make_request("GET", "/api/auth/streak", Some(&token), None)).await;
    let (status, second) =
        send(&db, make_request("GET", "/api/auth/streak", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["streak"], 1);
    assert_eq!(second["streak"], 1);
    assert_eq!(second["name"], "Test User");
    assert_eq!(second["activeDays"], first["activeDays"]);
    assert_eq!(second["lastActiveDate"], first["lastActiveDate"]);
}

#[tokio::test]
async fn test_update_details() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let (status, body) = send(
        &db,
        make_request(
            "PUT",
            "/api/auth/details",
            Some(&token),
            Some(json!({ "name": "Ada L", "reminderEnabled": true, "reminderTime": "08:30" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada L");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["reminderEnabled"], true);
    assert_eq!(body["reminderTime"], "08:30");

    let (status, _) = send(
        &db,
        make_request(
            "PUT",
            "/api/auth/details",
            Some(&token),
            Some(json!({ "reminderTime": "25:99" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_details_email_taken() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    setup_user(&db, "taken@example.com").await;
    let token = setup_user(&db, "ada@example.com").await;

    let (status, _) = send(
        &db,
        make_request(
            "PUT",
            "/api/auth/details",
            Some(&token),
            Some(json!({ "email": "taken@example.com" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_password() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let (status, _) = send(
        &db,
        make_request(
            "PUT",
            "/api/auth/password",
            Some(&token),
            Some(json!({ "oldPassword": "wrong-password", "newPassword": "brand-new" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &db,
        make_request(
            "PUT",
            "/api/auth/password",
            Some(&token),
            Some(json!({ "oldPassword": TEST_PASSWORD, "newPassword": "brand-new" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &db,
        make_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "brand-new" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Set Synchronization Tests
// =============================================================================

#[tokio::test]
async fn test_create_raw_set() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let body = create_set(
        &db,
        &token,
        json!({
            "title": "Bio",
            "description": "",
            "cards": [{ "term": "cell", "definition": "basic unit of life" }],
            "type": "raw"
        }),
    )
    .await;

    assert_eq!(body["set"]["title"], "Bio");
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["front"], "cell");
    assert_eq!(cards[0]["back"], "basic unit of life");
    assert_eq!(cards[0]["contentType"], "raw");
    assert_eq!(cards[0]["status"], "learning");
    assert_eq!(cards[0]["setId"], body["set"]["id"]);
}

#[tokio::test]
async fn test_create_set_generation_with_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let body = create_set(
        &db,
        &token,
        json!({
            "title": "Chem",
            "cards": [
                { "term": "atom", "definition": "smallest unit" },
                { "term": "ion", "definition": "FAIL charged atom" },
                { "term": "bond", "definition": "link between atoms" }
            ],
            "type": "summary"
        }),
    )
    .await;

    let backs: Vec<&str> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["back"].as_str().unwrap())
        .collect();
    assert_eq!(
        backs,
        vec!["[summary] smallest unit", "FAIL charged atom", "[summary] link between atoms"]
    );
}

#[tokio::test]
async fn test_create_set_without_title() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let (status, _) = send(
        &db,
        make_request(
            "POST",
            "/api/flashcards/sets",
            Some(&token),
            Some(json!({ "cards": [] })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_set_replaces_cards() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let created = create_set(
        &db,
        &token,
        json!({
            "title": "Bio",
            "cards": [
                { "term": "cell", "definition": "unit" },
                { "term": "gene", "definition": "heredity" }
            ]
        }),
    )
    .await;
    let set_id = created["set"]["id"].as_str().unwrap();

    let (status, body) = send(
        &db,
        make_request(
            "PUT",
            &format!("/api/flashcards/sets/{}", set_id),
            Some(&token),
            Some(json!({
                "title": "",
                "description": "updated",
                "cards": [{ "term": "atom", "definition": "smallest unit" }],
                "type": "raw"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["set"]["id"], set_id);
    assert_eq!(body["set"]["title"], "Bio");
    assert_eq!(body["set"]["description"], "updated");

    let (_, details) = send(
        &db,
        make_request("GET", &format!("/api/flashcards/sets/{}", set_id), Some(&token), None),
    )
    .await;
    let cards = details["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["front"], "atom");
}

#[tokio::test]
async fn test_update_set_by_non_owner_is_forbidden() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let owner = setup_user(&db, "owner@example.com").await;
    let intruder = setup_user(&db, "intruder@example.com").await;

    let created = create_set(
        &db,
        &owner,
        json!({ "title": "Bio", "cards": [{ "term": "cell", "definition": "unit" }] }),
    )
    .await;
    let uri = format!("/api/flashcards/sets/{}", created["set"]["id"].as_str().unwrap());

    let (status, body) = send(
        &db,
        make_request(
            "PUT",
            &uri,
            Some(&intruder),
            Some(json!({ "title": "Hacked", "cards": [] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "User not authorized");

    let (status, _) = send(&db, make_request("GET", &uri, Some(&intruder), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, details) = send(&db, make_request("GET", &uri, Some(&owner), None)).await;
    assert_eq!(details["set"]["title"], "Bio");
    assert_eq!(details["cards"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_lookup_errors() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let (status, _) = send(
        &db,
        make_request("GET", "/api/flashcards/sets/not-a-valid-id", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4();
    let (status, body) = send(
        &db,
        make_request("GET", &format!("/api/flashcards/sets/{}", unknown), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Set not found");
}

#[tokio::test]
async fn test_list_sets_with_card_counts() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;
    let other = setup_user(&db, "other@example.com").await;

    create_set(
        &db,
        &token,
        json!({
            "title": "Bio",
            "cards": [
                { "term": "cell", "definition": "unit" },
                { "term": "gene", "definition": "heredity" }
            ]
        }),
    )
    .await;
    create_set(&db, &other, json!({ "title": "Not mine" })).await;

    let (status, body) = send(
        &db,
        make_request("GET", "/api/flashcards/sets", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sets = body.as_array().unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0]["title"], "Bio");
    assert_eq!(sets[0]["cardCount"], 2);
}

#[tokio::test]
async fn test_add_and_delete_card() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let created = create_set(&db, &token, json!({ "title": "Bio" })).await;
    let set_id = created["set"]["id"].as_str().unwrap().to_string();

    let (status, card) = send(
        &db,
        make_request(
            "POST",
            &format!("/api/flashcards/sets/{}/cards", set_id),
            Some(&token),
            Some(json!({ "term": "cell", "definition": "unit", "type": "example" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["back"], "[example] unit");
    let card_id = card["id"].as_str().unwrap();

    let card_uri = format!("/api/flashcards/sets/{}/cards/{}", set_id, card_id);
    let (status, _) = send(&db, make_request("DELETE", &card_uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&db, make_request("DELETE", &card_uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_set_removes_cards() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let created = create_set(
        &db,
        &token,
        json!({ "title": "Bio", "cards": [{ "term": "cell", "definition": "unit" }] }),
    )
    .await;
    let uri = format!("/api/flashcards/sets/{}", created["set"]["id"].as_str().unwrap());

    let (status, body) = send(&db, make_request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&db, make_request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, due) = send(&db, make_request("GET", "/api/flashcards/due", Some(&token), None)).await;
    assert!(due.as_array().unwrap().is_empty());
}

// =============================================================================
// Review & Stats Tests
// =============================================================================

#[tokio::test]
async fn test_mastered_card_leaves_due_list() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    let created = create_set(
        &db,
        &token,
        json!({
            "title": "Bio",
            "cards": [
                { "term": "cell", "definition": "unit" },
                { "term": "gene", "definition": "heredity" }
            ]
        }),
    )
    .await;
    let first_id = created["cards"][0]["id"].as_str().unwrap();

    let (status, card) = send(
        &db,
        make_request(
            "PUT",
            &format!("/api/flashcards/{}/status", first_id),
            Some(&token),
            Some(json!({ "status": "mastered" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["status"], "mastered");

    let (_, due) = send(&db, make_request("GET", "/api/flashcards/due", Some(&token), None)).await;
    let due = due.as_array().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["front"], "gene");

    let (status, stats) = send(
        &db,
        make_request("GET", "/api/flashcards/stats", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalSets"], 1);
    assert_eq!(stats["cardsMastered"], 1);
    assert_eq!(stats["streak"], 1);
}

#[tokio::test]
async fn test_card_status_by_non_owner_is_forbidden() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let owner = setup_user(&db, "owner@example.com").await;
    let intruder = setup_user(&db, "intruder@example.com").await;

    let created = create_set(
        &db,
        &owner,
        json!({ "title": "Bio", "cards": [{ "term": "cell", "definition": "unit" }] }),
    )
    .await;
    let uri = format!(
        "/api/flashcards/{}/status",
        created["cards"][0]["id"].as_str().unwrap()
    );

    let (status, _) = send(
        &db,
        make_request("PUT", &uri, Some(&intruder), Some(json!({ "status": "mastered" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &db,
        make_request("PUT", &uri, Some(&owner), Some(json!({ "status": "forgotten" }))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Account Deletion Tests
// =============================================================================

#[tokio::test]
async fn test_delete_account_removes_everything() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let token = setup_user(&db, "ada@example.com").await;

    create_set(
        &db,
        &token,
        json!({ "title": "Bio", "cards": [{ "term": "cell", "definition": "unit" }] }),
    )
    .await;

    let (status, body) = send(
        &db,
        make_request("DELETE", "/api/auth/account", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Token no longer resolves to a user
    let (status, _) = send(&db, make_request("GET", "/api/auth/me", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Email is free again
    let (status, _) = send(
        &db,
        make_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}
