use serde::{Deserialize, Serialize};

use crate::coord::{BoardShape, Location};


// What a piece sees when it looks at a square. Squares occupied by its own pieces have no
// access at all (the access function returns `None`), which makes them implicitly illegal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SquareAccess {
    Empty,
    Opponent,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MoveReach {
    // Moves exactly by one of the deltas.
    Step,
    // Moves any number of squares in one of the directions.
    Slide,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MovementRule {
    pub reach: MoveReach,
    pub deltas: &'static [(i8, i8)],
    pub can_capture: bool,
}

pub const FORWARD_UP: [(i8, i8); 1] = [(-1, 0)];
pub const FORWARD_DOWN: [(i8, i8); 1] = [(1, 0)];
pub const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

impl MovementRule {
    pub const fn step(deltas: &'static [(i8, i8)]) -> Self {
        MovementRule { reach: MoveReach::Step, deltas, can_capture: true }
    }
    pub const fn slide(deltas: &'static [(i8, i8)]) -> Self {
        MovementRule { reach: MoveReach::Slide, deltas, can_capture: true }
    }
    pub const fn royal_step(deltas: &'static [(i8, i8)]) -> Self {
        MovementRule { reach: MoveReach::Step, deltas, can_capture: false }
    }

    // Destinations reachable from `origin`. Directions are evaluated independently; a slider
    // stops right after the first opponent piece and right before the first own piece.
    pub fn range(
        &self, origin: Location, shape: BoardShape, access: impl Fn(Location) -> Option<SquareAccess>,
    ) -> Vec<Location> {
        let mut ret = Vec::new();
        for &delta in self.deltas {
            let mut pos = origin;
            while let Some(next) = shape.offset(pos, delta) {
                match access(next) {
                    None => break,
                    Some(SquareAccess::Opponent) => {
                        if self.can_capture {
                            ret.push(next);
                        }
                        break;
                    }
                    Some(SquareAccess::Empty) => ret.push(next),
                }
                if self.reach == MoveReach::Step {
                    break;
                }
                pos = next;
            }
        }
        ret
    }
}
