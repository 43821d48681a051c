use std::fmt::Write;

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::coord::{BoardShape, Location};
use crate::game::{GameState, GameStatus};
use crate::piece::piece_to_ascii;
use crate::player::Player;


// Renders the snapshot as text: the grid with row/col indices, then captured pieces and status.
pub fn render_as_ascii(state: &GameState, shape: BoardShape) -> String {
    let mut out = String::new();
    let header = shape.cols().map(|col| format!("{col:>2}")).join("");
    writeln!(out, "  {header}").ok();
    for row in shape.rows() {
        let cells = shape
            .cols()
            .map(|col| match state.piece_at(Location::new(row, col)) {
                Some(piece) => piece_to_ascii(piece.kind, piece.owner),
                None => '.',
            })
            .map(|ch| format!(" {ch}"))
            .join("");
        writeln!(out, "{row:>2}{cells}").ok();
    }
    let reserves = state.reserves();
    for player in Player::iter() {
        let captured = reserves[player]
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(kind, count)| format!("{}x{count}", piece_to_ascii(kind, player)))
            .join(" ");
        let captured = if captured.is_empty() { "-".to_owned() } else { captured };
        writeln!(out, "Player {} captured: {captured}", player.to_digit()).ok();
    }
    let active = state.active_player.to_digit();
    match state.status {
        GameStatus::Ongoing => {
            write!(out, "Player {active} to act ({} left)", state.actions_remaining).ok();
        }
        GameStatus::PlayerWin => {
            write!(out, "Player {active} wins").ok();
        }
        GameStatus::PlayerLose => {
            write!(out, "Player {} wins", state.active_player.opponent().to_digit()).ok();
        }
    }
    out
}
