//! HTTP API for the hand history store.
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /                        - API banner
//! GET  /health                  - Health check (pings the database when there is one)
//! POST /api/v1/hands/           - Store a finished hand
//! GET  /api/v1/hands/           - List stored hands, newest first
//! GET  /api/v1/hands/{hand_id}  - Fetch one hand
//! ```
//!
//! The hand routes also answer without the trailing slash.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use sm_server::api::{AppState, create_router};
//! use sixmax::InMemoryHandRepository;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState {
//!     repository: Arc::new(InMemoryHandRepository::new()),
//!     database: None,
//! };
//! let app = create_router(state, &["http://localhost:3000".to_string()]);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod hands;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json},
    routing::get,
};
use serde_json::json;
use sixmax::{Database, HandRepository};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where hands are stored
    pub repository: Arc<dyn HandRepository>,
    /// Connection pool, when the store is PostgreSQL-backed
    pub database: Option<Database>,
}

/// Create the API router with all endpoints and middleware.
///
/// # Arguments
///
/// - `state`: Application state
/// - `allowed_origins`: Origins CORS lets through
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let v1_routes = Router::new()
        .route("/hands", get(hands::list_hands).post(hands::create_hand))
        .route("/hands/", get(hands::list_hands).post(hands::create_hand))
        .route("/hands/{hand_id}", get(hands::get_hand));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id::request_id_middleware))
                .layer(cors_layer(allowed_origins)),
        )
        .with_state(state)
}

/// CORS restricted to the given origins.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(request_id::REQUEST_ID_HEADER),
        ])
}

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Poker Game API" }))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when healthy, or `503 Service Unavailable` when the
/// database doesn't answer.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","database":true,"timestamp":"2026-01-05T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let Some(database) = &state.database else {
        return (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "timestamp": timestamp })),
        );
    };

    match database.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": true, "timestamp": timestamp })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": false, "timestamp": timestamp })),
            )
        }
    }
}
