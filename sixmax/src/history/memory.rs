//! In-process hand history store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    errors::HistoryResult,
    models::{NewHand, StoredHand, settle_winnings},
    repository::HandRepository,
};

/// Keeps hands in a vector, oldest first. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryHandRepository {
    hands: RwLock<Vec<StoredHand>>,
}

impl InMemoryHandRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.hands.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hands.read().await.is_empty()
    }
}

#[async_trait]
impl HandRepository for InMemoryHandRepository {
    async fn create_hand(&self, hand: NewHand) -> HistoryResult<StoredHand> {
        hand.validate()?;
        let winnings = settle_winnings(&hand);
        let stored = StoredHand::from_new(hand, winnings);
        self.hands.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_hands(&self) -> HistoryResult<Vec<StoredHand>> {
        Ok(self.hands.read().await.iter().rev().cloned().collect())
    }

    async fn get_hand(&self, id: &str) -> HistoryResult<Option<StoredHand>> {
        Ok(self.hands.read().await.iter().find(|h| h.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryError;

    fn hand(board: &str) -> NewHand {
        NewHand {
            stacks: vec![1000; 6],
            dealer_index: 0,
            small_blind_index: 1,
            big_blind_index: 2,
            actions: vec!["Showdown".to_string()],
            hole_cards: vec!["AsKd".to_string(); 6],
            board: board.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = InMemoryHandRepository::new();
        let stored = repo.create_hand(hand("Ah2s3d")).await.unwrap();
        assert_eq!(stored.winnings, vec![0; 6]);

        let found = repo.get_hand(&stored.id).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(repo.get_hand("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryHandRepository::new();
        let first = repo.create_hand(hand("Ah")).await.unwrap();
        let second = repo.create_hand(hand("Ah2s")).await.unwrap();

        let listed = repo.list_hands().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_invalid_hand_not_stored() {
        let repo = InMemoryHandRepository::new();
        let mut bad = hand("");
        bad.stacks.truncate(3);
        let err = repo.create_hand(bad).await.unwrap_err();
        assert!(matches!(err, HistoryError::InvalidHand(_)));
        assert!(repo.is_empty().await);
    }
}
