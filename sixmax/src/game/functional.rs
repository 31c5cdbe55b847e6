//! Pure helpers the state machine is built from. None of these mutate state.

use super::{
    constants::NUM_SEATS,
    entities::{Action, ActionKind, Chips, Player, Position, SeatIndex},
    state_machine::ActionError,
};

#[must_use]
pub fn position_for(seat: SeatIndex, dealer: SeatIndex) -> Position {
    Position::for_seat(seat % NUM_SEATS, dealer % NUM_SEATS)
}

/// Next seat clockwise from `from` whose player can still act.
///
/// Scans every other seat once. When nobody else can act the scan wraps back
/// around to `from`, which is returned unchanged; callers treat that as "no
/// one left to act" rather than looping.
#[must_use]
pub fn next_active_seat(players: &[Player], from: SeatIndex) -> SeatIndex {
    let n = players.len();
    if n == 0 {
        return from;
    }
    (1..n)
        .map(|offset| (from + offset) % n)
        .find(|&seat| players[seat].can_act())
        .unwrap_or(from)
}

/// A betting round is complete when at most one player is left in the hand,
/// or every live player who can still act has matched `current_bet`.
#[must_use]
pub fn betting_round_complete(players: &[Player], current_bet: Chips) -> bool {
    let live = players.iter().filter(|p| !p.is_folded).count();
    live <= 1
        || players
            .iter()
            .filter(|p| p.can_act())
            .all(|p| p.current_bet == current_bet)
}

/// Legality of `action` for `player` facing a round bet of `table_bet`.
/// Turn order is the caller's concern.
pub fn check_action(player: &Player, action: &Action, table_bet: Chips) -> Result<(), ActionError> {
    if player.is_folded {
        return Err(ActionError::PlayerFolded(player.seat));
    }
    if player.is_all_in {
        return Err(ActionError::PlayerAllIn(player.seat));
    }
    match *action {
        Action::Fold => Ok(()),
        Action::Check if player.current_bet == table_bet => Ok(()),
        Action::Check => Err(ActionError::CannotCheck {
            to_call: table_bet.saturating_sub(player.current_bet),
        }),
        Action::Call if table_bet <= player.current_bet => Err(ActionError::CannotCall),
        Action::Bet(_) if table_bet != 0 => Err(ActionError::CannotBet {
            current_bet: table_bet,
        }),
        Action::Raise(_) if table_bet == 0 => Err(ActionError::CannotRaise),
        Action::Bet(0) | Action::Raise(0) => Err(ActionError::InvalidAmount),
        Action::Raise(amount) if amount <= table_bet => Err(ActionError::RaiseTooSmall {
            amount,
            current_bet: table_bet,
        }),
        _ if player.stack == 0 => Err(ActionError::NoChips),
        Action::Call | Action::Bet(_) | Action::Raise(_) | Action::AllIn => Ok(()),
    }
}

/// Action kinds `player` may choose from right now.
#[must_use]
pub fn legal_actions(player: &Player, table_bet: Chips) -> Vec<ActionKind> {
    let candidates = [
        Action::Fold,
        Action::Check,
        Action::Call,
        Action::Bet(player.stack.max(1)),
        Action::Raise(table_bet.saturating_add(1)),
        Action::AllIn,
    ];
    candidates
        .iter()
        .filter(|action| check_action(player, action, table_bet).is_ok())
        .map(Action::kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(stacks: [Chips; NUM_SEATS]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(seat, &stack)| Player::new(seat, stack, 0))
            .collect()
    }

    #[test]
    fn test_position_for_wraps_seat_numbers() {
        assert_eq!(position_for(1, 0), Position::SmallBlind);
        assert_eq!(position_for(8, 6), Position::BigBlind);
        assert_eq!(position_for(0, 5), Position::SmallBlind);
    }

    #[test]
    fn test_next_active_seat_wraps() {
        let players = table([1000; NUM_SEATS]);
        assert_eq!(next_active_seat(&players, 3), 4);
        assert_eq!(next_active_seat(&players, 5), 0);
    }

    #[test]
    fn test_next_active_seat_skips_folded_and_all_in() {
        let mut players = table([1000; NUM_SEATS]);
        players[4].is_folded = true;
        players[5].is_all_in = true;
        players[0].is_folded = true;
        assert_eq!(next_active_seat(&players, 3), 1);
    }

    #[test]
    fn test_next_active_seat_sentinel_when_nobody_left() {
        let mut players = table([1000; NUM_SEATS]);
        for seat in [0, 1, 2, 4, 5] {
            players[seat].is_folded = true;
        }
        assert_eq!(next_active_seat(&players, 3), 3);
    }

    #[test]
    fn test_round_complete_with_one_live_player() {
        let mut players = table([1000; NUM_SEATS]);
        for seat in 1..NUM_SEATS {
            players[seat].is_folded = true;
        }
        assert!(betting_round_complete(&players, 40));
    }

    #[test]
    fn test_round_incomplete_until_bets_match() {
        let mut players = table([1000; NUM_SEATS]);
        players[1].commit(20);
        players[2].commit(40);
        assert!(!betting_round_complete(&players, 40));
        for seat in [0, 1, 3, 4, 5] {
            let owed = 40 - players[seat].current_bet;
            players[seat].commit(owed);
        }
        assert!(betting_round_complete(&players, 40));
    }

    #[test]
    fn test_round_ignores_all_in_short_stacks() {
        let mut players = table([1000, 1000, 30, 1000, 1000, 1000]);
        for seat in [0, 1, 3, 4, 5] {
            players[seat].commit(100);
        }
        players[2].commit(100);
        assert!(players[2].is_all_in);
        assert!(betting_round_complete(&players, 100));
    }

    #[test]
    fn test_check_requires_matched_bet() {
        let mut player = Player::new(2, 1000, 0);
        assert!(check_action(&player, &Action::Check, 0).is_ok());
        assert_eq!(
            check_action(&player, &Action::Check, 40),
            Err(ActionError::CannotCheck { to_call: 40 })
        );
        player.commit(40);
        assert!(check_action(&player, &Action::Check, 40).is_ok());
    }

    #[test]
    fn test_bet_and_raise_gating() {
        let player = Player::new(3, 1000, 0);
        assert!(check_action(&player, &Action::Bet(50), 0).is_ok());
        assert_eq!(
            check_action(&player, &Action::Bet(50), 40),
            Err(ActionError::CannotBet { current_bet: 40 })
        );
        assert_eq!(
            check_action(&player, &Action::Raise(80), 0),
            Err(ActionError::CannotRaise)
        );
        assert_eq!(
            check_action(&player, &Action::Raise(40), 40),
            Err(ActionError::RaiseTooSmall {
                amount: 40,
                current_bet: 40
            })
        );
        assert_eq!(
            check_action(&player, &Action::Bet(0), 0),
            Err(ActionError::InvalidAmount)
        );
        assert!(check_action(&player, &Action::Raise(5000), 40).is_ok());
    }

    #[test]
    fn test_call_needs_something_to_call() {
        let player = Player::new(3, 1000, 0);
        assert_eq!(
            check_action(&player, &Action::Call, 0),
            Err(ActionError::CannotCall)
        );
        assert!(check_action(&player, &Action::Call, 40).is_ok());
    }

    #[test]
    fn test_folded_and_all_in_players_cannot_act() {
        let mut folded = Player::new(1, 1000, 0);
        folded.is_folded = true;
        assert_eq!(
            check_action(&folded, &Action::Fold, 0),
            Err(ActionError::PlayerFolded(1))
        );
        let mut all_in = Player::new(2, 10, 0);
        all_in.commit(10);
        assert_eq!(
            check_action(&all_in, &Action::Check, 10),
            Err(ActionError::PlayerAllIn(2))
        );
    }

    #[test]
    fn test_legal_actions_facing_bet() {
        let player = Player::new(3, 1000, 0);
        assert_eq!(
            legal_actions(&player, 40),
            vec![
                ActionKind::Fold,
                ActionKind::Call,
                ActionKind::Raise,
                ActionKind::AllIn
            ]
        );
    }

    #[test]
    fn test_legal_actions_unopened_round() {
        let player = Player::new(1, 1000, 0);
        assert_eq!(
            legal_actions(&player, 0),
            vec![
                ActionKind::Fold,
                ActionKind::Check,
                ActionKind::Bet,
                ActionKind::AllIn
            ]
        );
    }
}
