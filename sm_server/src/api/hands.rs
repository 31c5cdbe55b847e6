//! Hand history endpoints.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use sixmax::{HistoryError, NewHand, StoredHand};

use super::{AppState, request_id::RequestId};
use crate::metrics;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Store a finished hand.
///
/// A malformed body or a hand that fails validation is a `400`.
pub async fn create_hand(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    payload: Result<Json<NewHand>, JsonRejection>,
) -> Result<Json<StoredHand>, ApiError> {
    let Json(hand) = payload.map_err(|rejection| {
        metrics::hands_rejected_total();
        tracing::warn!(request_id = %request_id, error = %rejection, "Rejected hand body");
        api_error(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let actions = hand.actions.len();
    match state.repository.create_hand(hand).await {
        Ok(stored) => {
            metrics::hands_created_total();
            metrics::hand_actions(actions);
            tracing::info!(request_id = %request_id, hand_id = %stored.id, "Hand stored");
            Ok(Json(stored))
        }
        Err(e) => {
            match e {
                HistoryError::InvalidHand(_) => metrics::hands_rejected_total(),
                _ => metrics::store_errors_total("create"),
            }
            tracing::warn!(request_id = %request_id, error = %e, "Failed to store hand");
            Err(api_error(StatusCode::BAD_REQUEST, e.client_message()))
        }
    }
}

/// All stored hands, newest first.
pub async fn list_hands(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredHand>>, ApiError> {
    metrics::hands_listed_total();
    state.repository.list_hands().await.map(Json).map_err(|e| {
        metrics::store_errors_total("list");
        tracing::error!(error = %e, "Failed to list hands");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.client_message())
    })
}

/// One hand by id, or `404` when there is none.
pub async fn get_hand(
    State(state): State<AppState>,
    Path(hand_id): Path<String>,
) -> Result<Json<StoredHand>, ApiError> {
    let found = state.repository.get_hand(&hand_id).await.map_err(|e| {
        metrics::store_errors_total("get");
        tracing::error!(hand_id = %hand_id, error = %e, "Failed to load hand");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.client_message())
    })?;

    metrics::hand_lookups_total(found.is_some());
    found
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Hand not found"))
}
