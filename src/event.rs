use serde::{Deserialize, Serialize};

use crate::game::PlayerAction;
use crate::rules::Rules;
use crate::starter::PiecePositions;


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PeerEvent {
    // Sent by the host before the first action. Both sides start from this exact layout.
    BoardSetup {
        rules: Rules,
        positions: PiecePositions,
    },
    // `seq` is the number of actions applied before this one.
    Action {
        seq: u32,
        action: PlayerAction,
    },
    // Asks the peer for its full history after a desync.
    ResyncRequest {
        known_seq: u32,
    },
    Resync {
        rules: Rules,
        positions: PiecePositions,
        actions: Vec<PlayerAction>,
    },
}
