use sixmax::{Action, Chips, NUM_SEATS};
use std::fmt;

/// A line typed at the table prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deal the next hand
    Start,
    /// Act for the seat whose turn it is
    Act(Action),
    /// Reseat every player with new stacks
    Stacks(Vec<Chips>),
    /// Move the button and reset for another hand
    Next,
    /// Print the table
    State,
    /// List stored hands
    History,
    /// Print one stored hand
    Hand(String),
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Amount isn't a whole number of chips.
    InvalidAmount(String),
    /// Bet or raise without an amount.
    MissingAmount(&'static str),
    /// `stacks` needs one value per seat.
    WrongStackCount(usize),
    /// `hand` without an id.
    MissingHandId,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(value) => write!(
                f,
                "Invalid amount '{value}'. Must be a positive number (e.g., 'raise 100')"
            ),
            Self::MissingAmount(verb) => {
                write!(f, "'{verb}' needs an amount (e.g., '{verb} 100')")
            }
            Self::WrongStackCount(got) => write!(
                f,
                "'stacks' needs {NUM_SEATS} values, got {got} (e.g., 'stacks 1000 1000 1000 1000 1000 1000')"
            ),
            Self::MissingHandId => write!(f, "'hand' needs a hand id (see 'history')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
Commands:
  start                  Deal a hand
  fold | check | call    Act for the highlighted seat
  bet N                  Open the betting for N chips
  raise N                Raise to a total of N chips this round
  all-in                 Push the whole stack
  stacks N N N N N N     Set every seat's stack (between hands)
  next                   Move the button for another hand
  state                  Show the table
  history                List stored hands
  hand ID                Show a stored hand
  help                   Show this message
  quit                   Leave the table
";

/// Parse a command string.
///
/// # Examples
///
/// ```
/// use sm_client::commands::{Command, parse_command};
/// use sixmax::Action;
///
/// assert_eq!(parse_command("call"), Ok(Command::Act(Action::Call)));
/// assert_eq!(parse_command("raise 100"), Ok(Command::Act(Action::Raise(100))));
/// assert_eq!(parse_command("hand abc"), Ok(Command::Hand("abc".to_string())));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed {
        "start" | "deal" => return Ok(Command::Start),
        "fold" => return Ok(Command::Act(Action::Fold)),
        "check" => return Ok(Command::Act(Action::Check)),
        "call" => return Ok(Command::Act(Action::Call)),
        "all-in" | "allin" => return Ok(Command::Act(Action::AllIn)),
        "next" => return Ok(Command::Next),
        "state" | "table" => return Ok(Command::State),
        "history" => return Ok(Command::History),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"bet") => parse_amount("bet", &parts).map(|a| Command::Act(Action::Bet(a))),
        Some(&"raise") => parse_amount("raise", &parts).map(|a| Command::Act(Action::Raise(a))),
        Some(&"stacks") => parse_stacks(&parts[1..]),
        Some(&"hand") => parts
            .get(1)
            .map(|id| Command::Hand(id.to_string()))
            .ok_or(ParseError::MissingHandId),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

fn parse_amount(verb: &'static str, parts: &[&str]) -> Result<Chips, ParseError> {
    let value = parts.get(1).ok_or(ParseError::MissingAmount(verb))?;
    value
        .parse::<Chips>()
        .map_err(|_| ParseError::InvalidAmount(value.to_string()))
}

fn parse_stacks(values: &[&str]) -> Result<Command, ParseError> {
    if values.len() != NUM_SEATS {
        return Err(ParseError::WrongStackCount(values.len()));
    }
    values
        .iter()
        .map(|v| {
            v.parse::<Chips>()
                .map_err(|_| ParseError::InvalidAmount(v.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Command::Stacks)
}
