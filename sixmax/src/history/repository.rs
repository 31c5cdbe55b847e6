//! Repository trait for hand history stores.

use async_trait::async_trait;

use super::{
    errors::HistoryResult,
    models::{NewHand, StoredHand},
};

/// Where finished hands go.
#[async_trait]
pub trait HandRepository: Send + Sync {
    /// Store a finished hand and return it with its id, winnings and timestamp
    async fn create_hand(&self, hand: NewHand) -> HistoryResult<StoredHand>;

    /// All stored hands, newest first
    async fn list_hands(&self) -> HistoryResult<Vec<StoredHand>>;

    /// Look up one hand by id
    async fn get_hand(&self, id: &str) -> HistoryResult<Option<StoredHand>>;
}
