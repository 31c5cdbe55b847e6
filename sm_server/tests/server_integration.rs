//! Integration tests for the hand history HTTP API.
//!
//! Every test drives the router in-process against the in-memory store.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sixmax::{
    HandRepository, HistoryError, HistoryResult, InMemoryHandRepository, NewHand, StoredHand,
};
use sm_server::api::{AppState, create_router, hands::ErrorResponse};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

const FRONTEND: &str = "http://localhost:3000";

fn app_with(repository: Arc<dyn HandRepository>) -> axum::Router {
    let state = AppState {
        repository,
        database: None,
    };
    create_router(state, &[FRONTEND.to_string()])
}

fn app() -> (axum::Router, Arc<InMemoryHandRepository>) {
    let repository = Arc::new(InMemoryHandRepository::new());
    (app_with(repository.clone()), repository)
}

fn sample_hand() -> Value {
    json!({
        "stacks": [1000, 1000, 1000, 1000, 1000, 1000],
        "dealer_index": 0,
        "small_blind_index": 1,
        "big_blind_index": 2,
        "actions": [
            "Player 2 posts small blind 20",
            "Player 3 posts big blind 40",
            "Player 4 folds",
            "Flop: Ah 2s 3d"
        ],
        "hole_cards": ["AsKd", "QhQc", "2c7d", "JhTh", "9s9d", "5c4c"],
        "board": "Ah2s3dJcTs"
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ============================================================================
// Root & Health
// ============================================================================

#[tokio::test]
async fn test_root_banner() {
    let (app, _) = app();
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body, json!({ "message": "Poker Game API" }));
}

#[tokio::test]
async fn test_health_without_database() {
    let (app, _) = app();
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_hand_returns_stored_record() {
    let (app, repository) = app();
    let response = app
        .oneshot(post_json("/api/v1/hands/", &sample_hand()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored: StoredHand = body_json(response).await;
    assert!(uuid::Uuid::parse_str(&stored.id).is_ok());
    assert_eq!(stored.stacks, vec![1000; 6]);
    assert_eq!(stored.winnings, vec![0; 6]);
    assert_eq!(stored.board, "Ah2s3dJcTs");
    assert_eq!(stored.actions.len(), 4);
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_create_hand_without_trailing_slash() {
    let (app, repository) = app();
    let response = app
        .oneshot(post_json("/api/v1/hands", &sample_hand()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_create_hand_rejects_wrong_seat_count() {
    let (app, repository) = app();
    let mut hand = sample_hand();
    hand["stacks"] = json!([1000, 1000, 1000, 1000, 1000]);

    let response = app.oneshot(post_json("/api/v1/hands/", &hand)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body_json(response).await;
    assert!(body.error.contains("expected 6 stacks"));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_create_hand_rejects_bad_cards() {
    let (app, _) = app();
    let mut hand = sample_hand();
    hand["board"] = json!("Ah2s3dJcT");

    let response = app.oneshot(post_json("/api/v1/hands/", &hand)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_hand_rejects_malformed_json() {
    let (app, _) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/hands/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"stacks\": [1000"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body_json(response).await;
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_create_hand_rejects_missing_stacks() {
    let (app, _) = app();
    let response = app
        .oneshot(post_json("/api/v1/hands/", &json!({ "dealer_index": 0 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_hand_with_only_stacks() {
    let (app, repository) = app();
    let response = app
        .oneshot(post_json(
            "/api/v1/hands/",
            &json!({ "stacks": [1000, 1000, 1000, 1000, 1000, 1000] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored: StoredHand = body_json(response).await;
    assert_eq!(
        (stored.dealer_index, stored.small_blind_index, stored.big_blind_index),
        (0, 1, 2)
    );
    assert!(stored.actions.is_empty());
    assert!(stored.hole_cards.is_empty());
    assert_eq!(stored.board, "");
    assert_eq!(repository.len().await, 1);
}

// ============================================================================
// List & Get
// ============================================================================

#[tokio::test]
async fn test_list_hands_newest_first() {
    let (app, _) = app();

    let mut ids = Vec::new();
    for board in ["Ah2s3d", "Ah2s3dJc", "Ah2s3dJcTs"] {
        let mut hand = sample_hand();
        hand["board"] = json!(board);
        let response = app
            .clone()
            .oneshot(post_json("/api/v1/hands/", &hand))
            .await
            .unwrap();
        let stored: StoredHand = body_json(response).await;
        ids.push(stored.id);
    }

    let response = app.oneshot(get("/api/v1/hands/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<StoredHand> = body_json(response).await;
    let listed_ids: Vec<String> = listed.into_iter().map(|h| h.id).collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);
}

#[tokio::test]
async fn test_list_hands_empty() {
    let (app, _) = app();
    let response = app.oneshot(get("/api/v1/hands")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<StoredHand> = body_json(response).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_get_hand_by_id() {
    let (app, _) = app();
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/hands/", &sample_hand()))
        .await
        .unwrap();
    let stored: StoredHand = body_json(response).await;

    let response = app
        .oneshot(get(&format!("/api/v1/hands/{}", stored.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched: StoredHand = body_json(response).await;
    assert_eq!(fetched, stored);
}

#[tokio::test]
async fn test_get_unknown_hand_is_404() {
    let (app, _) = app();
    let response = app
        .oneshot(get("/api/v1/hands/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(response).await;
    assert_eq!(body, json!({ "error": "Hand not found" }));
}

// ============================================================================
// Store Failures
// ============================================================================

struct FailingRepository;

#[async_trait]
impl HandRepository for FailingRepository {
    async fn create_hand(&self, _hand: NewHand) -> HistoryResult<StoredHand> {
        Err(HistoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_hands(&self) -> HistoryResult<Vec<StoredHand>> {
        Err(HistoryError::Corrupt("stacks".to_string()))
    }

    async fn get_hand(&self, _id: &str) -> HistoryResult<Option<StoredHand>> {
        Err(HistoryError::Transport("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_store_failure_on_create_is_400_without_details() {
    let app = app_with(Arc::new(FailingRepository));
    let response = app
        .oneshot(post_json("/api/v1/hands/", &sample_hand()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body_json(response).await;
    assert_eq!(body.error, "Internal server error");
}

#[tokio::test]
async fn test_store_failure_on_list_and_get_is_500() {
    let app = app_with(Arc::new(FailingRepository));

    let response = app.clone().oneshot(get("/api/v1/hands/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.oneshot(get("/api/v1/hands/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let (app, _) = app();

    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app.oneshot(get("/")).await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_cors_allows_frontend_origin_only() {
    let (app, _) = app();

    let request = Request::builder()
        .uri("/api/v1/hands/")
        .header(header::ORIGIN, FRONTEND)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        FRONTEND
    );

    let request = Request::builder()
        .uri("/api/v1/hands/")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = app();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/hands/")
        .header(header::ORIGIN, FRONTEND)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        FRONTEND
    );
}
