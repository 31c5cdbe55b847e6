//! # Sixmax
//!
//! A six-handed Texas Hold'em hand engine.
//!
//! The engine drives a single hand from blinds to showdown: turn order,
//! action legality, pot accumulation, and dealing the board street by street.
//! Finished hands are summarized for a hand history store.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, seats, and the betting-round state machine
//! - [`history`]: Hand history records and the repository contract
//! - [`db`]: PostgreSQL connection pool and repository
//! - [`table`]: Actor that serializes every action on a live hand
//!
//! ## Example
//!
//! ```
//! use sixmax::{Action, Blinds, Deck, HandState, Phase};
//!
//! let mut hand = HandState::new(&[1000; 6], 0, Blinds::default()).unwrap();
//! hand.start_hand(Deck::seeded(7)).unwrap();
//! assert_eq!(hand.pot(), 60);
//!
//! hand.take_action(3, Action::Call).unwrap();
//! assert_eq!(hand.phase(), Phase::Preflop);
//! ```

/// Cards, seats, and the betting-round state machine.
pub mod game;
pub use game::{
    ActionError, ActionOutcome, HandError, HandState,
    constants::{self, DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, DEFAULT_STACK, NUM_SEATS},
    entities::{
        self, Action, ActionKind, Blinds, Card, CardParseError, Chips, Deck, Phase, Player,
        Position, SeatIndex,
    },
    functional,
};

/// Hand history records and storage.
pub mod history;
pub use history::{
    HandRepository, HistoryError, HistoryResult, InMemoryHandRepository, NewHand, StoredHand,
};

/// Database connection management.
pub mod db;
pub use db::{Database, DatabaseConfig, PgHandRepository};

/// Single-table actor.
pub mod table;
pub use table::{TableActor, TableConfig, TableHandle, TableMessage, TableResponse};
