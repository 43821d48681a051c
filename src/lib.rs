#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod coord;
pub mod display;
pub mod error;
pub mod event;
pub mod game;
pub mod grid;
pub mod movement;
pub mod network;
pub mod notation;
pub mod online;
pub mod piece;
pub mod player;
pub mod rules;
pub mod starter;

pub use board::Board;
pub use coord::{BoardShape, Location};
pub use display::render_as_ascii;
pub use error::{ActionError, SetupError, SyncError};
pub use event::PeerEvent;
pub use game::{ActionType, GameEngine, GameState, GameStatus, PieceView, PlayerAction};
pub use notation::{action_to_notation, parse_action};
pub use online::OnlineGame;
pub use piece::{Piece, PieceId, PieceKind};
pub use player::Player;
pub use rules::{DropSafety, InvalidActionPolicy, Rules, StartingPosition};
