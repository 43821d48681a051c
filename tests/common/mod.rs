// Improvement potential. Combine integration tests together:
//   https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

use itertools::Itertools;
use pokechess::coord::Location;
use pokechess::error::ActionError;
use pokechess::game::GameEngine;
use pokechess::notation::parse_action;
use pokechess::piece::piece_from_ascii;
use pokechess::rules::Rules;
use pokechess::starter::{PiecePlacement, PiecePositions};


#[macro_export]
macro_rules! loc {
    ($row:literal, $col:literal) => {
        pokechess::coord::Location::new($row, $col)
    };
}

// Rows are listed top to bottom, starting with row 0. Uppercase letters are player One.
#[allow(dead_code)]
pub fn parse_board(rules: Rules, board_str: &str) -> GameEngine {
    let shape = rules.board_shape;
    let rows = board_str
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split_ascii_whitespace().collect_vec())
        .collect_vec();
    assert_eq!(rows.len(), shape.num_rows as usize);
    assert!(rows.iter().all(|row| row.len() == shape.num_cols as usize));
    let mut positions = PiecePositions::new();
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if *cell == "." {
                continue;
            }
            let ch = cell.chars().exactly_one().ok().unwrap();
            let (kind, owner) = piece_from_ascii(ch).unwrap();
            let location = Location::new(row_idx as u8, col_idx as u8);
            positions.push(PiecePlacement::new(owner, kind, location));
        }
    }
    GameEngine::from_positions(rules, positions).unwrap()
}

// Applies an action written in text notation on behalf of the active player.
#[allow(dead_code)]
pub fn act(engine: &mut GameEngine, notation: &str) -> Result<(), ActionError> {
    let action = parse_action(notation, engine.active_player(), engine.state()).unwrap();
    engine.apply_action(action).map(|_| ())
}

#[allow(dead_code)]
pub fn replay(engine: &mut GameEngine, log: &str) -> Result<(), ActionError> {
    for notation in log.split_whitespace() {
        act(engine, notation)?;
    }
    Ok(())
}
