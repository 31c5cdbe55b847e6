//! Hand engine: cards, seats, and the betting-round state machine.
//!
//! A [`HandState`] is one owned value per hand. It moves through
//! `setup → preflop → flop → turn → river → showdown → finished`, rejecting
//! any action that is out of turn or breaks the betting rules.

pub mod constants;
pub mod entities;
pub mod functional;
mod state_machine;

pub use state_machine::{ActionError, ActionOutcome, HandError, HandState};
