//! HTTP client for the hand history server.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use sixmax::{HandRepository, HistoryError, HistoryResult, NewHand, StoredHand};

/// Hand store reached over the server's JSON API
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn hands_url(&self) -> String {
        format!("{}/api/v1/hands/", self.base_url)
    }

    /// Check the server answers its health check
    pub async fn health(&self) -> HistoryResult<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| transport("Failed to reach server", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(HistoryError::Transport(format!(
                "Health check failed with {}",
                response.status()
            )))
        }
    }
}

#[async_trait]
impl HandRepository for ApiClient {
    async fn create_hand(&self, hand: NewHand) -> HistoryResult<StoredHand> {
        let response = self
            .client
            .post(self.hands_url())
            .json(&hand)
            .send()
            .await
            .map_err(|e| transport("Failed to send hand", e))?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| transport("Failed to parse stored hand", e)),
            StatusCode::BAD_REQUEST => Err(HistoryError::InvalidHand(error_text(response).await)),
            status => Err(HistoryError::Transport(format!(
                "Store rejected hand with {status}: {}",
                error_text(response).await
            ))),
        }
    }

    async fn list_hands(&self) -> HistoryResult<Vec<StoredHand>> {
        let response = self
            .client
            .get(self.hands_url())
            .send()
            .await
            .map_err(|e| transport("Failed to list hands", e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HistoryError::Transport(format!(
                "Listing hands failed with {status}: {}",
                error_text(response).await
            )));
        }

        response
            .json()
            .await
            .map_err(|e| transport("Failed to parse hand list", e))
    }

    async fn get_hand(&self, id: &str) -> HistoryResult<Option<StoredHand>> {
        let response = self
            .client
            .get(format!("{}{id}", self.hands_url()))
            .send()
            .await
            .map_err(|e| transport("Failed to fetch hand", e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json()
                .await
                .map(Some)
                .map_err(|e| transport("Failed to parse hand", e)),
            status => Err(HistoryError::Transport(format!(
                "Fetching hand failed with {status}: {}",
                error_text(response).await
            ))),
        }
    }
}

fn transport(context: &str, e: reqwest::Error) -> HistoryError {
    HistoryError::Transport(format!("{context}: {e}"))
}

/// The server's `{"error": ...}` message, or the raw body when it isn't one.
async fn error_text(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body),
        Err(e) => format!("Failed to read error response: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.hands_url(), "http://localhost:8000/api/v1/hands/");
    }
}
