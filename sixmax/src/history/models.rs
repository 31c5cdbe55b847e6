//! Hand history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{HistoryError, HistoryResult};
use crate::game::{
    constants::{BOARD_SIZE, HOLE_CARDS, NUM_SEATS},
    entities::parse_cards,
};

/// A finished hand as submitted to the store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NewHand {
    /// Stacks at the start of the hand, before blinds.
    pub stacks: Vec<i64>,
    /// Everything below may be left out and falls back to a fresh hand
    /// with the button on seat 0.
    #[serde(default)]
    pub dealer_index: i32,
    #[serde(default = "default_small_blind_index")]
    pub small_blind_index: i32,
    #[serde(default = "default_big_blind_index")]
    pub big_blind_index: i32,
    /// Action log lines in the order they happened.
    #[serde(default)]
    pub actions: Vec<String>,
    /// One concatenated string per seat, e.g. `"AsKd"`.
    #[serde(default)]
    pub hole_cards: Vec<String>,
    /// Concatenated board, e.g. `"Ah2s3dJcTs"`.
    #[serde(default)]
    pub board: String,
}

const fn default_small_blind_index() -> i32 {
    1
}

const fn default_big_blind_index() -> i32 {
    2
}

impl NewHand {
    /// Reject anything that can't be a six-seat hand.
    pub fn validate(&self) -> HistoryResult<()> {
        if self.stacks.len() != NUM_SEATS {
            return Err(invalid(format!(
                "expected {NUM_SEATS} stacks, got {}",
                self.stacks.len()
            )));
        }
        if let Some(stack) = self.stacks.iter().find(|&&s| s < 0) {
            return Err(invalid(format!("negative stack {stack}")));
        }
        for (name, index) in [
            ("dealer_index", self.dealer_index),
            ("small_blind_index", self.small_blind_index),
            ("big_blind_index", self.big_blind_index),
        ] {
            if usize::try_from(index).map_or(true, |i| i >= NUM_SEATS) {
                return Err(invalid(format!("{name} {index} is not a seat")));
            }
        }
        if self.hole_cards.len() > NUM_SEATS {
            return Err(invalid(format!(
                "{} hole card entries for {NUM_SEATS} seats",
                self.hole_cards.len()
            )));
        }
        for cards in &self.hole_cards {
            let parsed = parse_cards(cards).map_err(|e| invalid(e.to_string()))?;
            if !parsed.is_empty() && parsed.len() != HOLE_CARDS {
                return Err(invalid(format!("hole cards {cards:?} are not a pair")));
            }
        }
        let board = parse_cards(&self.board).map_err(|e| invalid(e.to_string()))?;
        if board.len() > BOARD_SIZE {
            return Err(invalid(format!("board {:?} has too many cards", self.board)));
        }
        Ok(())
    }
}

/// A hand as the store returns it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StoredHand {
    pub id: String,
    pub stacks: Vec<i64>,
    pub dealer_index: i32,
    pub small_blind_index: i32,
    pub big_blind_index: i32,
    pub actions: Vec<String>,
    pub hole_cards: Vec<String>,
    pub board: String,
    pub winnings: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl StoredHand {
    /// Stamp a new hand with a fresh id and the current time.
    pub fn from_new(hand: NewHand, winnings: Vec<i64>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stacks: hand.stacks,
            dealer_index: hand.dealer_index,
            small_blind_index: hand.small_blind_index,
            big_blind_index: hand.big_blind_index,
            actions: hand.actions,
            hole_cards: hand.hole_cards,
            board: hand.board,
            winnings,
            created_at: Utc::now(),
        }
    }
}

/// Net winnings per seat. Hands are never evaluated, so every seat gets 0.
pub fn settle_winnings(hand: &NewHand) -> Vec<i64> {
    vec![0; hand.stacks.len()]
}

fn invalid(reason: String) -> HistoryError {
    HistoryError::InvalidHand(reason)
}
