//! Table module: a single table driven by an async actor.
//!
//! ## Architecture
//!
//! The table runs in its own Tokio task with an mpsc inbox. Messages are
//! handled one at a time, and any phase advances a completed betting round
//! calls for are drained before the next message is read, so no action ever
//! lands mid-advance. Finished hands are handed to a [`HandRepository`] on a
//! spawned task; a failed save is logged and the hand stays finished.
//!
//! ## Example
//!
//! ```no_run
//! use sixmax::{Action, InMemoryHandRepository, TableActor, TableConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(InMemoryHandRepository::new());
//!     let (actor, handle) = TableActor::new(TableConfig::default(), store).unwrap();
//!     tokio::spawn(actor.run());
//!
//!     handle.start_hand().await.unwrap();
//!     handle.take_action(3, Action::Call).await.unwrap();
//! }
//! ```
//!
//! [`HandRepository`]: crate::history::HandRepository

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use messages::{TableMessage, TableResponse};
