// Compact text notation for actions, used by the console client:
//   "6,3-5,3" moves the piece from row 6 col 3 to row 5 col 3;
//   "E@4,4" drops a captured Eevee onto row 4 col 4.

use std::fmt;

use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::coord::Location;
use crate::game::{ActionType, GameState, PlayerAction};
use crate::piece::PieceKind;
use crate::player::Player;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotationError {
    InvalidNotation(String),
    UnknownPiece(char),
    EmptySquare(Location),
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::InvalidNotation(s) => write!(f, "cannot parse \"{s}\""),
            NotationError::UnknownPiece(ch) => write!(f, "unknown piece '{ch}'"),
            NotationError::EmptySquare(loc) => write!(f, "no piece at {loc}"),
        }
    }
}

impl std::error::Error for NotationError {}

fn parse_location(row: &str, col: &str) -> Result<Location, NotationError> {
    let parse = |s: &str| s.parse::<u8>().map_err(|_| NotationError::InvalidNotation(s.to_owned()));
    Ok(Location::new(parse(row)?, parse(col)?))
}

// The kind of a moving piece is taken from the snapshot, so that the user only types squares.
pub fn parse_action(
    notation: &str, player: Player, state: &GameState,
) -> Result<PlayerAction, NotationError> {
    lazy_static! {
        static ref MOVE_RE: Regex = Regex::new(r"^(\d+),(\d+)\s*-\s*(\d+),(\d+)$").unwrap();
        static ref DROP_RE: Regex = Regex::new(r"^([A-Za-z])@(\d+),(\d+)$").unwrap();
    }
    let notation = notation.trim();
    if let Some(cap) = MOVE_RE.captures(notation) {
        let from = parse_location(&cap[1], &cap[2])?;
        let to = parse_location(&cap[3], &cap[4])?;
        let piece = state.piece_at(from).ok_or(NotationError::EmptySquare(from))?;
        Ok(PlayerAction::movement(player, piece.kind, from, to))
    } else if let Some(cap) = DROP_RE.captures(notation) {
        let ch = cap[1].chars().next().ok_or_else(|| NotationError::InvalidNotation(notation.to_owned()))?;
        let kind = PieceKind::from_ascii(ch).ok_or(NotationError::UnknownPiece(ch))?;
        // Forward movers are always held in the form that advances for their owner.
        let kind = match kind {
            PieceKind::Eevee | PieceKind::EeveeShiny => PieceKind::forward_for(player),
            _ => kind,
        };
        let to = parse_location(&cap[2], &cap[3])?;
        Ok(PlayerAction::drop(player, kind, to))
    } else {
        Err(NotationError::InvalidNotation(notation.to_owned()))
    }
}

pub fn action_to_notation(action: &PlayerAction) -> String {
    match (action.action_type, action.source) {
        (ActionType::Move, Some(from)) => format!("{from}-{}", action.target),
        (ActionType::Move, None) => format!("?-{}", action.target),
        (ActionType::Drop, _) => format!("{}@{}", action.piece_kind.to_ascii(), action.target),
    }
}
