use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    constants::{BOARD_SIZE, DEFAULT_STACK, HOLE_CARDS, NUM_SEATS},
    entities::{
        Action, ActionKind, Blinds, Card, Chips, Deck, Phase, Player, SeatIndex, cards_to_string,
    },
    functional::{self, betting_round_complete, check_action, next_active_seat},
};
use crate::history::NewHand;

/// Why an action was turned away. The hand is left untouched whenever one of
/// these is returned.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ActionError {
    #[error("no betting round in progress ({phase})")]
    HandNotInProgress { phase: Phase },
    #[error("betting round closed, waiting on the next street")]
    RoundClosed,
    #[error("seat {seat} acted out of turn, waiting on seat {expected}")]
    OutOfTurn {
        seat: SeatIndex,
        expected: SeatIndex,
    },
    #[error("no seat {0}")]
    InvalidSeat(SeatIndex),
    #[error("seat {0} already folded")]
    PlayerFolded(SeatIndex),
    #[error("seat {0} is all-in")]
    PlayerAllIn(SeatIndex),
    #[error("can't check, {to_call} to call")]
    CannotCheck { to_call: Chips },
    #[error("nothing to call")]
    CannotCall,
    #[error("can't bet into an open bet of {current_bet}")]
    CannotBet { current_bet: Chips },
    #[error("nothing to raise, bet instead")]
    CannotRaise,
    #[error("raise to {amount} doesn't beat the current bet of {current_bet}")]
    RaiseTooSmall { amount: Chips, current_bet: Chips },
    #[error("amount must be positive")]
    InvalidAmount,
    #[error("no chips behind")]
    NoChips,
}

/// Lifecycle misuse: starting twice, bad seating, summarizing too early.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HandError {
    #[error("hand already started")]
    AlreadyStarted,
    #[error("expected {NUM_SEATS} stacks, got {0}")]
    InvalidSeatCount(usize),
    #[error("dealer seat {0} is out of range")]
    InvalidDealer(SeatIndex),
    #[error("stacks add up to more than {} chips", Chips::MAX)]
    TooManyChips,
    #[error("deck has {available} cards, a hand needs {needed}")]
    ShortDeck { needed: usize, available: usize },
    #[error("hand is not finished")]
    NotFinished,
}

/// What an accepted action did.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub seat: SeatIndex,
    pub action: Action,
    /// Chips moved from the stack into the pot.
    pub amount: Chips,
    /// The action closed the betting round.
    pub round_complete: bool,
}

/// One hand at a six-seat table, from seating to showdown.
///
/// All mutation goes through [`HandState::start_hand`],
/// [`HandState::take_action`], and [`HandState::advance_if_needed`].
#[derive(Clone, Debug, Serialize)]
pub struct HandState {
    players: Vec<Player>,
    board: Vec<Card>,
    pot: Chips,
    current_bet: Chips,
    dealer_index: SeatIndex,
    small_blind_index: SeatIndex,
    big_blind_index: SeatIndex,
    active_player_index: SeatIndex,
    phase: Phase,
    actions: Vec<String>,
    blinds: Blinds,
    /// Stacks as they were before blinds, recorded in the hand history.
    starting_stacks: Vec<Chips>,
    #[serde(skip)]
    deck: Deck,
    /// A betting round closed and the next phase hasn't been dealt yet.
    #[serde(rename = "awaiting_advance")]
    pending_advance: bool,
}

impl HandState {
    /// Seat six players in `Setup`. Nothing is dealt or posted yet.
    pub fn new(stacks: &[Chips], dealer: SeatIndex, blinds: Blinds) -> Result<Self, HandError> {
        if stacks.len() != NUM_SEATS {
            return Err(HandError::InvalidSeatCount(stacks.len()));
        }
        if dealer >= NUM_SEATS {
            return Err(HandError::InvalidDealer(dealer));
        }
        check_chip_total(stacks)?;
        let players = stacks
            .iter()
            .enumerate()
            .map(|(seat, &stack)| Player::new(seat, stack, dealer))
            .collect();
        Ok(Self {
            players,
            board: Vec::with_capacity(BOARD_SIZE),
            pot: 0,
            current_bet: 0,
            dealer_index: dealer,
            small_blind_index: (dealer + 1) % NUM_SEATS,
            big_blind_index: (dealer + 2) % NUM_SEATS,
            active_player_index: (dealer + 3) % NUM_SEATS,
            phase: Phase::Setup,
            actions: Vec::new(),
            blinds,
            starting_stacks: stacks.to_vec(),
            deck: Deck::default(),
            pending_advance: false,
        })
    }

    /// Replace the stacks before the hand starts.
    pub fn set_stacks(&mut self, stacks: &[Chips]) -> Result<(), HandError> {
        if self.phase != Phase::Setup {
            return Err(HandError::AlreadyStarted);
        }
        if stacks.len() != NUM_SEATS {
            return Err(HandError::InvalidSeatCount(stacks.len()));
        }
        check_chip_total(stacks)?;
        for (player, &stack) in self.players.iter_mut().zip(stacks) {
            player.stack = stack;
        }
        self.starting_stacks = stacks.to_vec();
        Ok(())
    }

    /// Deal hole cards from `deck`, post the blinds, and hand the action to
    /// the seat after the big blind.
    pub fn start_hand(&mut self, mut deck: Deck) -> Result<(), HandError> {
        if self.phase != Phase::Setup {
            return Err(HandError::AlreadyStarted);
        }
        let needed = NUM_SEATS * HOLE_CARDS + BOARD_SIZE;
        if deck.remaining() < needed {
            return Err(HandError::ShortDeck {
                needed,
                available: deck.remaining(),
            });
        }

        self.starting_stacks = self.players.iter().map(|p| p.stack).collect();
        let hole_cards = deck.deal_hole_cards(NUM_SEATS);
        for (player, cards) in self.players.iter_mut().zip(hole_cards) {
            player.reset(self.dealer_index);
            player.hole_cards = cards;
        }
        self.deck = deck;
        self.board.clear();
        self.actions.clear();
        self.pot = 0;

        let small = self.post_blind(self.small_blind_index, self.blinds.small);
        self.record(format!(
            "{} posts small blind {small}",
            self.players[self.small_blind_index].name
        ));
        let big = self.post_blind(self.big_blind_index, self.blinds.big);
        self.record(format!(
            "{} posts big blind {big}",
            self.players[self.big_blind_index].name
        ));

        // Empty seats can't put chips in, so they ride along as all-in.
        for player in &mut self.players {
            if player.stack == 0 {
                player.is_all_in = true;
            }
        }
        self.current_bet = self.table_bet();
        self.phase = Phase::Preflop;

        let utg = (self.dealer_index + 3) % NUM_SEATS;
        self.active_player_index = if self.players[utg].can_act() {
            utg
        } else {
            next_active_seat(&self.players, utg)
        };
        self.pending_advance = self.nobody_left_to_act();

        info!(
            "Hand started: dealer seat {}, blinds {}, pot {}",
            self.dealer_index, self.blinds, self.pot
        );
        Ok(())
    }

    /// Apply `action` for `seat`, which must be the active seat.
    ///
    /// When the action closes the betting round the hand stops accepting
    /// actions until [`HandState::advance_if_needed`] deals the next phase.
    pub fn take_action(
        &mut self,
        seat: SeatIndex,
        action: Action,
    ) -> Result<ActionOutcome, ActionError> {
        if let Err(error) = self.check_turn(seat, &action) {
            debug!("Rejected {action:?} from seat {seat}: {error}");
            return Err(error);
        }

        let table_bet = self.current_bet;
        let player = &mut self.players[seat];
        let (moved, entry) = match action {
            Action::Fold => {
                player.is_folded = true;
                (0, format!("{} folds", player.name))
            }
            Action::Check => (0, format!("{} checks", player.name)),
            Action::Call => {
                let moved = player.commit(table_bet - player.current_bet);
                (moved, format!("{} calls {moved}", player.name))
            }
            Action::Bet(amount) => {
                let moved = player.commit(amount);
                (moved, format!("{} bets {moved}", player.name))
            }
            Action::Raise(amount) => {
                let target = amount.min(player.stack + player.current_bet);
                let moved = player.commit(target.saturating_sub(player.current_bet));
                let entry = if player.current_bet > table_bet {
                    format!("{} raises to {}", player.name, player.current_bet)
                } else {
                    // Too short to raise: whatever went in was the whole stack.
                    format!("{} goes all-in {}", player.name, player.current_bet)
                };
                (moved, entry)
            }
            Action::AllIn => {
                let moved = player.commit(player.stack);
                (
                    moved,
                    format!("{} goes all-in {}", player.name, player.current_bet),
                )
            }
        };

        self.pot += moved;
        self.current_bet = self.table_bet();
        self.record(entry);
        self.active_player_index = next_active_seat(&self.players, seat);

        let round_complete = self.is_betting_round_complete();
        if round_complete {
            self.pending_advance = true;
            debug!("Betting round complete on the {}", self.phase);
        }
        Ok(ActionOutcome {
            seat,
            action,
            amount: moved,
            round_complete,
        })
    }

    #[must_use]
    pub fn is_betting_round_complete(&self) -> bool {
        betting_round_complete(&self.players, self.current_bet)
    }

    /// Move to the next phase if a betting round has closed since the last
    /// advance. Returns the phase entered, or `None` when nothing was due, so
    /// calling it again right away never deals twice.
    pub fn advance_if_needed(&mut self) -> Option<Phase> {
        if !self.pending_advance {
            return None;
        }
        self.pending_advance = false;

        match self.phase {
            Phase::Preflop => self.deal_street(Phase::Flop, 3),
            Phase::Flop => self.deal_street(Phase::Turn, 1),
            Phase::Turn => self.deal_street(Phase::River, 1),
            Phase::River => {
                self.phase = Phase::Showdown;
                self.record("Showdown".to_string());
                self.pending_advance = true;
            }
            Phase::Showdown => {
                self.phase = Phase::Finished;
                info!("Hand finished with a pot of {}", self.pot);
            }
            Phase::Setup | Phase::Finished => return None,
        }
        if self.phase != Phase::Finished {
            info!("Advanced to the {}", self.phase);
        }
        Some(self.phase)
    }

    /// Legal action kinds for the active seat. Empty when no one can act.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<ActionKind> {
        if !self.phase.is_betting() || self.pending_advance {
            return Vec::new();
        }
        functional::legal_actions(&self.players[self.active_player_index], self.current_bet)
    }

    #[must_use]
    pub fn can_perform(&self, kind: ActionKind) -> bool {
        self.legal_actions().contains(&kind)
    }

    /// History record for a finished hand.
    #[must_use]
    pub fn summary(&self) -> Option<NewHand> {
        if self.phase != Phase::Finished {
            return None;
        }
        Some(NewHand {
            stacks: self.starting_stacks.iter().map(|&s| i64::from(s)).collect(),
            dealer_index: seat_to_i32(self.dealer_index),
            small_blind_index: seat_to_i32(self.small_blind_index),
            big_blind_index: seat_to_i32(self.big_blind_index),
            actions: self.actions.clone(),
            hole_cards: self
                .players
                .iter()
                .map(|p| cards_to_string(&p.hole_cards))
                .collect(),
            board: cards_to_string(&self.board),
        })
    }

    /// A fresh `Setup` hand with the button one seat clockwise and every
    /// stack carried over.
    pub fn next_hand(&self) -> Result<Self, HandError> {
        if self.phase != Phase::Finished {
            return Err(HandError::NotFinished);
        }
        let stacks: Vec<Chips> = self.players.iter().map(|p| p.stack).collect();
        Self::new(&stacks, (self.dealer_index + 1) % NUM_SEATS, self.blinds)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    #[must_use]
    pub const fn pot(&self) -> Chips {
        self.pot
    }

    #[must_use]
    pub const fn current_bet(&self) -> Chips {
        self.current_bet
    }

    #[must_use]
    pub const fn dealer_index(&self) -> SeatIndex {
        self.dealer_index
    }

    #[must_use]
    pub const fn small_blind_index(&self) -> SeatIndex {
        self.small_blind_index
    }

    #[must_use]
    pub const fn big_blind_index(&self) -> SeatIndex {
        self.big_blind_index
    }

    #[must_use]
    pub const fn active_player_index(&self) -> SeatIndex {
        self.active_player_index
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    #[must_use]
    pub const fn blinds(&self) -> Blinds {
        self.blinds
    }

    #[must_use]
    pub const fn is_awaiting_advance(&self) -> bool {
        self.pending_advance
    }

    fn check_turn(&self, seat: SeatIndex, action: &Action) -> Result<(), ActionError> {
        if !self.phase.is_betting() {
            return Err(ActionError::HandNotInProgress { phase: self.phase });
        }
        if self.pending_advance {
            return Err(ActionError::RoundClosed);
        }
        let player = self.players.get(seat).ok_or(ActionError::InvalidSeat(seat))?;
        if seat != self.active_player_index {
            return Err(ActionError::OutOfTurn {
                seat,
                expected: self.active_player_index,
            });
        }
        check_action(player, action, self.current_bet)
    }

    fn post_blind(&mut self, seat: SeatIndex, amount: Chips) -> Chips {
        let posted = self.players[seat].commit(amount);
        self.pot += posted;
        posted
    }

    /// Largest bet among players still in the hand.
    fn table_bet(&self) -> Chips {
        self.players
            .iter()
            .filter(|p| !p.is_folded)
            .map(|p| p.current_bet)
            .max()
            .unwrap_or(0)
    }

    fn deal_street(&mut self, next: Phase, count: usize) {
        let cards: Vec<Card> = (0..count).filter_map(|_| self.deck.deal_card()).collect();
        let label = match next {
            Phase::Flop => "Flop",
            Phase::Turn => "Turn",
            _ => "River",
        };
        let codes: Vec<String> = cards.iter().map(ToString::to_string).collect();
        self.record(format!("{label}: {}", codes.join(" ")));
        self.board.extend(cards);

        for player in &mut self.players {
            player.current_bet = 0;
        }
        self.current_bet = 0;
        self.phase = next;
        self.active_player_index = if self.players[self.small_blind_index].can_act() {
            self.small_blind_index
        } else {
            next_active_seat(&self.players, self.small_blind_index)
        };
        // All-in or heads-down runouts close the new round straight away.
        self.pending_advance = self.nobody_left_to_act();
    }

    /// Whether the betting round that is about to begin is already over:
    /// one player left in the hand, or at most one who can act and owes
    /// nothing.
    fn nobody_left_to_act(&self) -> bool {
        if self.players.iter().filter(|p| !p.is_folded).count() <= 1 {
            return true;
        }
        let mut actors = self.players.iter().filter(|p| p.can_act());
        match (actors.next(), actors.next()) {
            (None, _) => true,
            (Some(player), None) => player.current_bet >= self.current_bet,
            _ => false,
        }
    }

    fn record(&mut self, entry: String) {
        debug!("{entry}");
        self.actions.push(entry);
    }
}

/// Every chip at the table has to fit in one pot.
fn check_chip_total(stacks: &[Chips]) -> Result<(), HandError> {
    stacks
        .iter()
        .try_fold(0, |total: Chips, &stack| total.checked_add(stack))
        .map(|_| ())
        .ok_or(HandError::TooManyChips)
}

impl Default for HandState {
    fn default() -> Self {
        Self {
            players: (0..NUM_SEATS)
                .map(|seat| Player::new(seat, DEFAULT_STACK, 0))
                .collect(),
            board: Vec::with_capacity(BOARD_SIZE),
            pot: 0,
            current_bet: 0,
            dealer_index: 0,
            small_blind_index: 1,
            big_blind_index: 2,
            active_player_index: 3,
            phase: Phase::Setup,
            actions: Vec::new(),
            blinds: Blinds::default(),
            starting_stacks: vec![DEFAULT_STACK; NUM_SEATS],
            deck: Deck::default(),
            pending_advance: false,
        }
    }
}

fn seat_to_i32(seat: SeatIndex) -> i32 {
    // Seats are always below NUM_SEATS.
    i32::try_from(seat % NUM_SEATS).unwrap_or_default()
}
