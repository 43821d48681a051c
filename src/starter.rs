use std::collections::HashSet;

use derive_new::new;
use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::board::Board;
use crate::coord::{BoardShape, Location};
use crate::error::SetupError;
use crate::piece::{PieceFactory, PieceKind};
use crate::player::Player;
use crate::rules::{Rules, StartingPosition};


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new, Serialize, Deserialize)]
pub struct PiecePlacement {
    pub owner: Player,
    pub kind: PieceKind,
    pub location: Location,
}

pub type PiecePositions = Vec<PiecePlacement>;

// Columns of the two royals: the middle of the back row.
fn royal_cols(shape: BoardShape) -> (u8, u8) {
    let latias_col = shape.num_cols / 2 - 1;
    (latias_col, latias_col + 1)
}

fn classic_back_row(shape: BoardShape) -> Vec<Option<PieceKind>> {
    use PieceKind::*;
    let n = shape.num_cols as usize;
    let mut row = vec![None; n];
    row[0] = Some(Turtwig);
    row[n - 1] = Some(Turtwig);
    row[1] = Some(Pikachu);
    row[n - 2] = Some(Pikachu);
    row
}

fn shuffled_back_row(shape: BoardShape, rng: &mut impl Rng) -> Vec<Option<PieceKind>> {
    let (latias_col, latios_col) = royal_cols(shape);
    let mut row = classic_back_row(shape);
    let free_cols = shape
        .cols()
        .filter(|&col| col != latias_col && col != latios_col)
        .map(|col| col as usize)
        .collect_vec();
    let mut contents = free_cols.iter().map(|&col| row[col]).collect_vec();
    contents.shuffle(rng);
    for (col, kind) in free_cols.into_iter().zip(contents) {
        row[col] = kind;
    }
    row
}

// Places player One's pieces on the bottom two rows and mirrors them for player Two. Forward
// movers are swapped for the kind that advances towards the opponent.
fn mirrored_layout(shape: BoardShape, back_row: &[Option<PieceKind>]) -> PiecePositions {
    let (latias_col, latios_col) = royal_cols(shape);
    let back = shape.num_rows - 1;
    let front = shape.num_rows - 2;
    let mut one = Vec::new();
    for col in shape.cols() {
        if let Some(kind) = back_row[col as usize] {
            one.push((kind, Location::new(back, col)));
        }
    }
    one.push((PieceKind::Latias, Location::new(back, latias_col)));
    one.push((PieceKind::Latios, Location::new(back, latios_col)));
    for col in shape.cols().filter(|&col| col != latias_col && col != latios_col) {
        one.push((PieceKind::forward_for(Player::One), Location::new(front, col)));
    }

    let mut positions = PiecePositions::new();
    for player in Player::iter() {
        for &(kind, location) in &one {
            let (kind, location) = match player {
                Player::One => (kind, location),
                Player::Two if kind == PieceKind::forward_for(Player::One) => {
                    (PieceKind::forward_for(Player::Two), shape.mirror_row(location))
                }
                Player::Two => (kind, shape.mirror_row(location)),
            };
            positions.push(PiecePlacement::new(player, kind, location));
        }
    }
    positions.sort_by_key(|p| (p.location, p.owner));
    positions
}

pub fn canonical_layout(shape: BoardShape) -> PiecePositions {
    mirrored_layout(shape, &classic_back_row(shape))
}

pub fn generate_starting_layout(rules: &Rules, rng: &mut impl Rng) -> PiecePositions {
    let shape = rules.board_shape;
    match rules.starting_position {
        StartingPosition::Classic => canonical_layout(shape),
        StartingPosition::ShuffledMirrored => mirrored_layout(shape, &shuffled_back_row(shape, rng)),
    }
}


pub struct BoardSetter;

impl BoardSetter {
    pub fn verify(shape: BoardShape, positions: &[PiecePlacement]) -> Result<(), SetupError> {
        let mut taken = HashSet::new();
        for placement in positions {
            if !shape.contains(placement.location) {
                return Err(SetupError::OutOfBounds(placement.location));
            }
            if !taken.insert(placement.location) {
                return Err(SetupError::SquareTaken(placement.location));
            }
        }
        for player in Player::iter() {
            if !positions.iter().any(|p| p.owner == player && p.kind.is_royal()) {
                return Err(SetupError::MissingRoyal);
            }
        }
        Ok(())
    }

    // The board is left untouched if the layout is invalid.
    pub fn apply(board: &mut Board, positions: &[PiecePlacement]) -> Result<(), SetupError> {
        Self::verify(board.shape(), positions)?;
        for &PiecePlacement { owner, kind, location } in positions {
            board.place_initial(location, PieceFactory::make(kind, location, owner), owner);
        }
        Ok(())
    }
}
