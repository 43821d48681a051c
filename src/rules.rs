use serde::{Deserialize, Serialize};

use crate::coord::BoardShape;


pub const DEFAULT_ACTIONS_PER_TURN: u8 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum StartingPosition {
    Classic,
    // Non-royal back row pieces are shuffled, then mirrored for the opponent.
    ShuffledMirrored,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DropSafety {
    Unrestricted,
    // A drop may not leave every opponent royal without an escape square.
    NoImmobilizingDrop,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum InvalidActionPolicy {
    // Invalid actions are rejected and do not change the game.
    Reject,
    // Invalid actions are still rejected, but they use up one action from the budget.
    ConsumeAction,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Rules {
    pub board_shape: BoardShape,
    pub starting_position: StartingPosition,
    pub actions_per_turn: u8,
    pub drop_safety: DropSafety,
    pub invalid_action_policy: InvalidActionPolicy,
}

impl Rules {
    pub fn classic() -> Self {
        Rules {
            board_shape: BoardShape::standard(),
            starting_position: StartingPosition::Classic,
            actions_per_turn: DEFAULT_ACTIONS_PER_TURN,
            drop_safety: DropSafety::NoImmobilizingDrop,
            invalid_action_policy: InvalidActionPolicy::Reject,
        }
    }

    pub fn single_action() -> Self {
        Rules { actions_per_turn: 1, ..Rules::classic() }
    }

    pub fn verify(&self) -> Result<(), String> {
        let BoardShape { num_rows, num_cols } = self.board_shape;
        if num_rows < 4 {
            return Err(format!("Board must have at least 4 rows, got {num_rows}"));
        }
        if !(6..=16).contains(&num_cols) {
            return Err(format!("Board must have between 6 and 16 columns, got {num_cols}"));
        }
        if self.actions_per_turn == 0 {
            return Err("Players must have at least one action per turn".to_owned());
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        Rules::classic().verify().unwrap();
        Rules::single_action().verify().unwrap();
    }

    #[test]
    fn verify_rejects_bad_config() {
        let rules = Rules { actions_per_turn: 0, ..Rules::classic() };
        assert!(rules.verify().is_err());
        let rules = Rules {
            board_shape: BoardShape { num_rows: 2, num_cols: 8 },
            ..Rules::classic()
        };
        assert!(rules.verify().is_err());
    }

    #[test]
    fn rules_serialize_to_json() {
        let rules = Rules::classic();
        let json = serde_json::to_string(&rules).unwrap();
        let parsed: Rules = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rules);
    }
}
