//! Table actor message types.

use tokio::sync::oneshot;

use crate::game::{
    ActionError, ActionOutcome, HandState,
    entities::{Action, Chips, Phase, SeatIndex},
};

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Replace the stacks of a hand that hasn't started
    SetStacks {
        stacks: Vec<Chips>,
        response: oneshot::Sender<TableResponse>,
    },

    /// Shuffle, deal, and post blinds
    StartHand {
        response: oneshot::Sender<TableResponse>,
    },

    /// Player action at a seat
    TakeAction {
        seat: SeatIndex,
        action: Action,
        response: oneshot::Sender<TableResponse>,
    },

    /// Snapshot of the live hand
    GetState {
        response: oneshot::Sender<HandState>,
    },

    /// Seat the next hand once this one is finished
    NextHand {
        response: oneshot::Sender<TableResponse>,
    },

    /// Stop the actor
    Close {
        response: oneshot::Sender<TableResponse>,
    },
}

/// Response from table operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableResponse {
    /// Operation succeeded
    Success,

    /// Action applied; `phase` is where the hand stands after any advances
    ActionAccepted {
        outcome: ActionOutcome,
        phase: Phase,
    },

    /// Action turned away, hand unchanged
    InvalidAction(ActionError),

    /// Operation failed
    Error(String),
}

impl TableResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TableResponse::Success | TableResponse::ActionAccepted { .. }
        )
    }

    /// Get error message if response is error
    pub fn error_message(&self) -> Option<String> {
        match self {
            TableResponse::InvalidAction(err) => Some(format!("Invalid action: {err}")),
            TableResponse::Error(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}
