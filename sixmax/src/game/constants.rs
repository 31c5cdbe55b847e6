use super::entities::Chips;

/// Seats at the table. Seat indices are always taken modulo this.
pub const NUM_SEATS: usize = 6;

/// Hole cards dealt to each seat.
pub const HOLE_CARDS: usize = 2;

/// Community cards on a fully dealt board.
pub const BOARD_SIZE: usize = 5;

pub const DEFAULT_SMALL_BLIND: Chips = 20;
pub const DEFAULT_BIG_BLIND: Chips = 2 * DEFAULT_SMALL_BLIND;
pub const DEFAULT_STACK: Chips = 1000;
