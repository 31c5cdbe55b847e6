//! Hand history: what a finished hand looks like once stored, and the
//! repository contract stores implement.
//!
//! The PostgreSQL store lives in [`crate::db`]; an in-memory store is
//! provided here for tests and local play.

pub mod errors;
pub mod memory;
pub mod models;
pub mod repository;

pub use errors::{HistoryError, HistoryResult};
pub use memory::InMemoryHandRepository;
pub use models::{NewHand, StoredHand, settle_winnings};
pub use repository::HandRepository;
