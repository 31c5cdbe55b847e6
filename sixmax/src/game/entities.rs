use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};
use thiserror::Error;

use super::{
    constants::{DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, HOLE_CARDS, NUM_SEATS},
    functional::position_for,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Diamond, Self::Heart, Self::Spade];

    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Club => 'c',
            Self::Diamond => 'd',
            Self::Heart => 'h',
            Self::Spade => 's',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Self::Club),
            'd' => Some(Self::Diamond),
            'h' => Some(Self::Heart),
            's' => Some(Self::Spade),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Self; 13] = [
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
            Self::Nine => '9',
            Self::Ten => 'T',
            Self::Jack => 'J',
            Self::Queen => 'Q',
            Self::King => 'K',
            Self::Ace => 'A',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '2' => Some(Self::Two),
            '3' => Some(Self::Three),
            '4' => Some(Self::Four),
            '5' => Some(Self::Five),
            '6' => Some(Self::Six),
            '7' => Some(Self::Seven),
            '8' => Some(Self::Eight),
            '9' => Some(Self::Nine),
            'T' => Some(Self::Ten),
            'J' => Some(Self::Jack),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            'A' => Some(Self::Ace),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum CardParseError {
    #[error("invalid card code {0:?}")]
    InvalidCode(String),
    #[error("card list {0:?} has a dangling character")]
    OddLength(String),
}

/// A playing card, written as a 2-character code: rank then suit (`"As"`,
/// `"Td"`, `"2c"`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => match (Rank::from_char(r), Suit::from_char(su)) {
                (Some(rank), Some(suit)) => Ok(Self::new(rank, suit)),
                _ => Err(CardParseError::InvalidCode(s.to_string())),
            },
            _ => Err(CardParseError::InvalidCode(s.to_string())),
        }
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Concatenate card codes the way the hand history stores them (`"AsKd"`).
#[must_use]
pub fn cards_to_string(cards: &[Card]) -> String {
    cards.iter().map(ToString::to_string).collect()
}

/// Parse a concatenated card string such as `"Ah2s3d"`. An empty string is
/// an empty list.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardParseError> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(CardParseError::OddLength(s.to_string()));
    }
    chars
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>().parse())
        .collect()
}

#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    deck_idx: usize,
}

impl Deck {
    /// Unshuffled deck, rank-major with suits in `c d h s` order.
    #[must_use]
    pub fn ordered() -> Self {
        let cards = Rank::ALL
            .into_iter()
            .flat_map(|rank| Suit::ALL.into_iter().map(move |suit| Card::new(rank, suit)))
            .collect();
        Self { cards, deck_idx: 0 }
    }

    #[must_use]
    pub fn shuffled() -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(&mut rand::rng());
        deck
    }

    /// Deterministic shuffle, for replays and tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(&mut StdRng::seed_from_u64(seed));
        deck
    }

    /// A deck that deals `cards` in the given order.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, deck_idx: 0 }
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.cards.get(self.deck_idx).copied()?;
        self.deck_idx += 1;
        Some(card)
    }

    /// Deal two cards to each of `num_players` seats, one card per seat per
    /// pass.
    pub fn deal_hole_cards(&mut self, num_players: usize) -> Vec<Vec<Card>> {
        let mut hands = vec![Vec::with_capacity(HOLE_CARDS); num_players];
        for _ in 0..HOLE_CARDS {
            for hand in &mut hands {
                if let Some(card) = self.deal_card() {
                    hand.push(card);
                }
            }
        }
        hands
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::ordered()
    }
}

/// Whole chips. Stacks, bets, and the pot are never fractional.
pub type Chips = u32;

pub type SeatIndex = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

impl Blinds {
    /// The big blind is always twice the small blind. `None` when that
    /// doesn't fit in [`Chips`].
    #[must_use]
    pub const fn from_small(small: Chips) -> Option<Self> {
        match small.checked_mul(2) {
            Some(big) => Some(Self { small, big }),
            None => None,
        }
    }
}

impl Default for Blinds {
    fn default() -> Self {
        Self {
            small: DEFAULT_SMALL_BLIND,
            big: DEFAULT_BIG_BLIND,
        }
    }
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.small, self.big)
    }
}

/// Seat label relative to the dealer button.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Position {
    Dealer,
    SmallBlind,
    BigBlind,
    Utg,
    Mp,
    Co,
}

impl Position {
    #[must_use]
    pub fn for_seat(seat: SeatIndex, dealer: SeatIndex) -> Self {
        match (seat + NUM_SEATS - dealer % NUM_SEATS) % NUM_SEATS {
            0 => Self::Dealer,
            1 => Self::SmallBlind,
            2 => Self::BigBlind,
            3 => Self::Utg,
            4 => Self::Mp,
            _ => Self::Co,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Dealer => "Dealer",
            Self::SmallBlind => "Small Blind",
            Self::BigBlind => "Big Blind",
            Self::Utg => "UTG",
            Self::Mp => "MP",
            Self::Co => "CO",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Finished,
}

impl Phase {
    /// Whether players act in this phase.
    #[must_use]
    pub const fn is_betting(self) -> bool {
        matches!(self, Self::Preflop | Self::Flop | Self::Turn | Self::River)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Setup => "setup",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::Bet => "bet",
            Self::Raise => "raise",
            Self::AllIn => "all-in",
        };
        write!(f, "{repr}")
    }
}

/// A player decision. `Bet` carries the bet size, `Raise` the total the
/// player wants to be in for this round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
    AllIn,
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Fold => ActionKind::Fold,
            Self::Check => ActionKind::Check,
            Self::Call => ActionKind::Call,
            Self::Bet(_) => ActionKind::Bet,
            Self::Raise(_) => ActionKind::Raise,
            Self::AllIn => ActionKind::AllIn,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "folds"),
            Self::Check => write!(f, "checks"),
            Self::Call => write!(f, "calls"),
            Self::Bet(amount) => write!(f, "bets {amount}"),
            Self::Raise(amount) => write!(f, "raises to {amount}"),
            Self::AllIn => write!(f, "goes all-in"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub seat: SeatIndex,
    pub name: String,
    /// Chips not yet committed this hand.
    pub stack: Chips,
    pub hole_cards: Vec<Card>,
    /// Chips committed in the current betting round.
    pub current_bet: Chips,
    /// Chips committed over the whole hand.
    pub contributed: Chips,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub position: Position,
}

impl Player {
    #[must_use]
    pub fn new(seat: SeatIndex, stack: Chips, dealer: SeatIndex) -> Self {
        Self {
            seat,
            name: format!("Player {}", seat + 1),
            stack,
            hole_cards: Vec::with_capacity(HOLE_CARDS),
            current_bet: 0,
            contributed: 0,
            is_folded: false,
            is_all_in: false,
            position: position_for(seat, dealer),
        }
    }

    /// Clear every per-hand field. The stack carries over.
    pub fn reset(&mut self, dealer: SeatIndex) {
        self.hole_cards.clear();
        self.current_bet = 0;
        self.contributed = 0;
        self.is_folded = false;
        self.is_all_in = false;
        self.position = position_for(self.seat, dealer);
    }

    /// Neither folded nor all-in.
    #[must_use]
    pub const fn can_act(&self) -> bool {
        !self.is_folded && !self.is_all_in
    }

    /// Move up to `amount` from the stack into this round's bet and return
    /// what actually moved. Emptying the stack puts the player all-in.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let amount = amount.min(self.stack);
        self.stack -= amount;
        self.current_bet += amount;
        self.contributed += amount;
        if self.stack == 0 && !self.is_folded {
            self.is_all_in = true;
        }
        amount
    }
}
