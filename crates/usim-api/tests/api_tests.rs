//! API Integration Tests
//!
//! Runs the full router against in-memory collaborators; no external
//! Qdrant or Ollama instance is required.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use usim_api::testing::{create_router_for_testing, router_with, FailingEmbedder, InMemoryStore, StubEmbedder};

/// Helper to create a test request
fn create_json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn sample_user(name: &str) -> Value {
    json!({
        "name": name,
        "bio": "Backend engineer who hikes on weekends",
        "interests": ["rust", "hiking", "espresso"],
        "location": "Lisbon",
        "age": 34
    })
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// =============================================================================
// Create User Tests
// =============================================================================

#[tokio::test]
async fn test_create_user_returns_id_and_user() {
    let app = create_router_for_testing();

    let request = create_json_request("POST", "/users/", Some(sample_user("Maya")));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert!(json["id"].is_string());
    assert_eq!(json["user"]["name"], "Maya");
    assert_eq!(json["user"]["age"], 34);
    // similarity_score is absent outside find-similar
    assert!(json.get("similarity_score").is_none());
}

#[tokio::test]
async fn test_create_twice_yields_distinct_ids() {
    let app = create_router_for_testing();

    let first = app
        .clone()
        .oneshot(create_json_request(
            "POST",
            "/users/",
            Some(sample_user("Maya")),
        ))
        .await
        .unwrap();
    let second = app
        .oneshot(create_json_request(
            "POST",
            "/users/",
            Some(sample_user("Maya")),
        ))
        .await
        .unwrap();

    let first = response_json(first).await;
    let second = response_json(second).await;

    // Create is not idempotent: identical payloads get fresh ids.
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_create_user_rejects_malformed_body() {
    let app = create_router_for_testing();

    // Missing every required field
    let request = create_json_request("POST", "/users/", Some(json!({"name": "Maya"})));
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_create_user_accepts_missing_age() {
    let app = create_router_for_testing();

    let request = create_json_request(
        "POST",
        "/users/",
        Some(json!({
            "name": "Noor",
            "bio": "Writes parsers for fun",
            "interests": ["compilers"],
            "location": "Oslo"
        })),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["user"]["age"], Value::Null);
}

// =============================================================================
// Get User Tests
// =============================================================================

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = create_router_for_testing();

    let created = app
        .clone()
        .oneshot(create_json_request(
            "POST",
            "/users/",
            Some(sample_user("Ravi")),
        ))
        .await
        .unwrap();
    let created = response_json(created).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/users/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["id"].as_str().unwrap(), id);
    assert_eq!(json["user"], created["user"]);
}

#[tokio::test]
async fn test_get_unknown_id_returns_404() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/550e8400-e29b-41d4-a716-446655440000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = response_json(response).await;
    assert_eq!(json["detail"], "User not found");
}

// =============================================================================
// Find Similar Tests
// =============================================================================

#[tokio::test]
async fn test_find_similar_on_empty_store_returns_404() {
    let app = create_router_for_testing();

    let request = create_json_request("POST", "/users/find-similar/", Some(sample_user("Maya")));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = response_json(response).await;
    assert_eq!(json["detail"], "No similar users found");
}

#[tokio::test]
async fn test_find_similar_exact_match_scores_near_one() {
    let app = create_router_for_testing();

    let created = app
        .clone()
        .oneshot(create_json_request(
            "POST",
            "/users/",
            Some(sample_user("Maya")),
        ))
        .await
        .unwrap();
    let created = response_json(created).await;

    // Query with the identical payload: identical text, identical
    // embedding, cosine similarity at the maximum.
    let response = app
        .oneshot(create_json_request(
            "POST",
            "/users/find-similar/",
            Some(sample_user("Maya")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["id"], created["id"]);
    assert!(json["similarity_score"].as_f64().unwrap() > 0.99);
}

#[tokio::test]
async fn test_find_similar_picks_the_closest_profile() {
    let app = create_router_for_testing();

    for user in [
        sample_user("Maya"),
        json!({
            "name": "Bjorn",
            "bio": "Arctic photographer",
            "interests": ["glaciers", "drones"],
            "location": "Tromso",
            "age": 51
        }),
    ] {
        let response = app
            .clone()
            .oneshot(create_json_request("POST", "/users/", Some(user)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(create_json_request(
            "POST",
            "/users/find-similar/",
            Some(sample_user("Maya")),
        ))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["user"]["name"], "Maya");
}

// =============================================================================
// List Users Tests
// =============================================================================

#[tokio::test]
async fn test_list_users_empty() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_users_returns_all_entries() {
    let app = create_router_for_testing();

    for name in ["Maya", "Ravi", "Noor"] {
        let response = app
            .clone()
            .oneshot(create_json_request(
                "POST",
                "/users/",
                Some(sample_user(name)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = response_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    for entry in entries {
        assert!(entry["id"].is_string());
        assert!(entry["user"]["name"].is_string());
    }
}

// =============================================================================
// Embedding Failure Tests
// =============================================================================

#[tokio::test]
async fn test_create_returns_500_and_writes_nothing_when_embedding_fails() {
    let store = Arc::new(InMemoryStore::new());
    let app = router_with(Arc::new(FailingEmbedder), store.clone());

    let request = create_json_request("POST", "/users/", Some(sample_user("Maya")));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("embedding"));

    // The failure happened before the store was touched.
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_find_similar_returns_500_when_embedding_fails() {
    let store = Arc::new(InMemoryStore::new());

    // Seed a profile while embedding still works.
    let seeded = router_with(Arc::new(StubEmbedder::new(16)), store.clone());
    seeded
        .oneshot(create_json_request(
            "POST",
            "/users/",
            Some(sample_user("Maya")),
        ))
        .await
        .unwrap();

    let app = router_with(Arc::new(FailingEmbedder), store);
    let response = app
        .oneshot(create_json_request(
            "POST",
            "/users/find-similar/",
            Some(sample_user("Maya")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// OpenAPI Tests
// =============================================================================

#[tokio::test]
async fn test_openapi_spec_available() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert!(json["openapi"].is_string());
    assert!(json["paths"]["/users/"].is_object());
    assert!(json["paths"]["/users/find-similar/"].is_object());
}
