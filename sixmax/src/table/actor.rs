//! Table actor implementation with async message handling.

use log::{error, info};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::{
    config::TableConfig,
    messages::{TableMessage, TableResponse},
};
use crate::{
    game::{
        HandState,
        entities::{Action, Chips, Deck, Phase, SeatIndex},
    },
    history::HandRepository,
};

/// Table actor handle for sending messages
#[derive(Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
}

impl TableHandle {
    /// Create a new table handle
    pub fn new(sender: mpsc::Sender<TableMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the table
    pub async fn send(&self, message: TableMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Table is closed".to_string())
    }

    pub async fn set_stacks(&self, stacks: Vec<Chips>) -> Result<TableResponse, String> {
        self.request(|response| TableMessage::SetStacks { stacks, response })
            .await
    }

    pub async fn start_hand(&self) -> Result<TableResponse, String> {
        self.request(|response| TableMessage::StartHand { response })
            .await
    }

    pub async fn take_action(
        &self,
        seat: SeatIndex,
        action: Action,
    ) -> Result<TableResponse, String> {
        self.request(|response| TableMessage::TakeAction {
            seat,
            action,
            response,
        })
        .await
    }

    pub async fn state(&self) -> Result<HandState, String> {
        self.request(|response| TableMessage::GetState { response })
            .await
    }

    pub async fn next_hand(&self) -> Result<TableResponse, String> {
        self.request(|response| TableMessage::NextHand { response })
            .await
    }

    pub async fn close(&self) -> Result<TableResponse, String> {
        self.request(|response| TableMessage::Close { response })
            .await
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> TableMessage,
    ) -> Result<T, String> {
        let (tx, rx) = oneshot::channel();
        self.send(message(tx)).await?;
        rx.await.map_err(|_| "Table dropped the request".to_string())
    }
}

/// Table actor owning the one live hand at a table
pub struct TableActor {
    /// Table configuration
    config: TableConfig,

    /// The live hand
    state: HandState,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Where finished hands are saved
    store: Arc<dyn HandRepository>,

    /// Hands started at this table
    hand_count: u64,

    /// Is table closed
    is_closed: bool,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Arguments
    ///
    /// * `config` - Table configuration
    /// * `store` - Hand history store finished hands are saved to
    ///
    /// # Returns
    ///
    /// * `Ok((TableActor, TableHandle))` - Actor and handle for sending messages
    /// * `Err(String)` - The configuration can't seat a table
    pub fn new(
        config: TableConfig,
        store: Arc<dyn HandRepository>,
    ) -> Result<(Self, TableHandle), String> {
        config.validate()?;
        let state = HandState::new(
            &config.starting_stacks(),
            config.dealer_index,
            config.blinds,
        )
        .map_err(|e| e.to_string())?;

        let (sender, inbox) = mpsc::channel(100);
        let actor = Self {
            config,
            state,
            inbox,
            store,
            hand_count: 0,
            is_closed: false,
        };

        Ok((actor, TableHandle::new(sender)))
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        info!("Table '{}' starting", self.config.name);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;

            if self.is_closed {
                break;
            }
        }

        info!("Table '{}' closed", self.config.name);
    }

    /// Handle a table message
    async fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::SetStacks { stacks, response } => {
                let result = match self.state.set_stacks(&stacks) {
                    Ok(()) => TableResponse::Success,
                    Err(e) => TableResponse::Error(e.to_string()),
                };
                let _ = response.send(result);
            }

            TableMessage::StartHand { response } => {
                let result = self.handle_start().await;
                let _ = response.send(result);
            }

            TableMessage::TakeAction {
                seat,
                action,
                response,
            } => {
                let result = self.handle_action(seat, action).await;
                let _ = response.send(result);
            }

            TableMessage::GetState { response } => {
                let _ = response.send(self.state.clone());
            }

            TableMessage::NextHand { response } => {
                let result = match self.state.next_hand() {
                    Ok(next) => {
                        self.state = next;
                        TableResponse::Success
                    }
                    Err(e) => TableResponse::Error(e.to_string()),
                };
                let _ = response.send(result);
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(TableResponse::Success);
            }
        }
    }

    async fn handle_start(&mut self) -> TableResponse {
        let deck = match self.config.deck_seed {
            Some(seed) => Deck::seeded(seed.wrapping_add(self.hand_count)),
            None => Deck::shuffled(),
        };
        if let Err(e) = self.state.start_hand(deck) {
            return TableResponse::Error(e.to_string());
        }
        self.hand_count += 1;
        info!(
            "Table '{}': hand #{} started",
            self.config.name, self.hand_count
        );

        // Blinds alone can leave nobody able to act.
        self.drain_advances().await;
        TableResponse::Success
    }

    async fn handle_action(&mut self, seat: SeatIndex, action: Action) -> TableResponse {
        match self.state.take_action(seat, action) {
            Ok(outcome) => {
                self.drain_advances().await;
                TableResponse::ActionAccepted {
                    outcome,
                    phase: self.state.phase(),
                }
            }
            Err(e) => TableResponse::InvalidAction(e),
        }
    }

    /// Deal every phase a closed round calls for before the next message is
    /// read.
    async fn drain_advances(&mut self) {
        let delay = self.config.phase_delay();
        while self.state.is_awaiting_advance() {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if self.state.advance_if_needed() == Some(Phase::Finished) {
                self.persist_finished_hand();
            }
        }
    }

    /// Hand the finished hand to the store without waiting on it.
    fn persist_finished_hand(&self) {
        let Some(summary) = self.state.summary() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let table = self.config.name.clone();
        tokio::spawn(async move {
            match store.create_hand(summary).await {
                Ok(stored) => info!("Table '{table}': saved hand {}", stored.id),
                Err(e) => error!("Table '{table}': failed to save hand: {e}"),
            }
        });
    }
}
