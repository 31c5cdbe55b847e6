//! Plain-text table rendering.

use chrono::{DateTime, Local, Utc};
use sixmax::{HandState, Phase, Player, StoredHand, TableResponse};
use std::fmt::Write;

/// How many action log lines the table view shows
pub const LOG_TAIL: usize = 8;

fn join_cards<T: ToString>(cards: &[T]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn player_flags(player: &Player) -> &'static str {
    match (player.is_folded, player.is_all_in) {
        (true, _) => "folded",
        (false, true) => "all-in",
        (false, false) => "",
    }
}

fn render_player(out: &mut String, state: &HandState, player: &Player) {
    let marker = if state.phase().is_betting()
        && !state.is_awaiting_advance()
        && player.seat == state.active_player_index()
    {
        ">"
    } else {
        " "
    };
    let cards = if player.hole_cards.is_empty() {
        "--".to_string()
    } else {
        join_cards(&player.hole_cards)
    };
    let _ = writeln!(
        out,
        "{marker} {:<9} {:<12} stack {:>6}  bet {:>5}  {:<6} {}",
        player.name,
        player.position.to_string(),
        player.stack,
        player.current_bet,
        cards,
        player_flags(player)
    );
}

/// Table view: phase, board, pot, every seat, and the tail of the action log.
pub fn render_table(state: &HandState) -> String {
    let mut out = String::new();
    let board = if state.board().is_empty() {
        "-".to_string()
    } else {
        join_cards(state.board())
    };
    let _ = writeln!(
        out,
        "Phase: {}   Blinds: {}   Pot: {}   Current bet: {}",
        state.phase(),
        state.blinds(),
        state.pot(),
        state.current_bet()
    );
    let _ = writeln!(out, "Board: {board}");
    for player in state.players() {
        render_player(&mut out, state, player);
    }

    let actions = state.actions();
    if !actions.is_empty() {
        let _ = writeln!(out, "Log:");
        for line in &actions[actions.len().saturating_sub(LOG_TAIL)..] {
            let _ = writeln!(out, "  {line}");
        }
    }

    match state.phase() {
        Phase::Setup => {
            let _ = writeln!(out, "Type 'start' to deal.");
        }
        Phase::Finished => {
            let _ = writeln!(out, "Hand over. Type 'next' for another.");
        }
        _ => {
            if let Some(player) = state.players().get(state.active_player_index()) {
                let legal = state
                    .legal_actions()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "{} to act: {legal}", player.name);
            }
        }
    }
    out
}

/// Stored timestamps are UTC; the terminal shows local time.
fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// One line per stored hand.
pub fn render_history(hands: &[StoredHand]) -> String {
    if hands.is_empty() {
        return "No hands stored yet.\n".to_string();
    }
    let mut out = String::new();
    for hand in hands {
        let _ = writeln!(
            out,
            "{}  {}  dealer {}  board {:<10}  {} actions",
            hand.id,
            local_time(&hand.created_at),
            hand.dealer_index + 1,
            if hand.board.is_empty() { "-" } else { &hand.board },
            hand.actions.len()
        );
    }
    out
}

/// Full record of one stored hand.
pub fn render_stored_hand(hand: &StoredHand) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hand {} ({})", hand.id, local_time(&hand.created_at));
    let _ = writeln!(
        out,
        "Dealer: Player {}  SB: Player {}  BB: Player {}",
        hand.dealer_index + 1,
        hand.small_blind_index + 1,
        hand.big_blind_index + 1
    );
    for (seat, stack) in hand.stacks.iter().enumerate() {
        let cards = hand.hole_cards.get(seat).map_or("", String::as_str);
        let winnings = hand.winnings.get(seat).copied().unwrap_or_default();
        let _ = writeln!(
            out,
            "  Player {}  start {:>6}  {:<4}  won {}",
            seat + 1,
            stack,
            cards,
            winnings
        );
    }
    let _ = writeln!(out, "Board: {}", hand.board);
    for line in &hand.actions {
        let _ = writeln!(out, "  {line}");
    }
    out
}

/// Short human summary of a table reply.
pub fn render_response(response: &TableResponse) -> String {
    match response {
        TableResponse::Success => "ok".to_string(),
        TableResponse::ActionAccepted { outcome, phase } => format!(
            "Player {} {} ({phase})",
            outcome.seat + 1,
            outcome.action
        ),
        TableResponse::InvalidAction(e) => format!("Not allowed: {e}"),
        TableResponse::Error(e) => format!("Error: {e}"),
    }
}
