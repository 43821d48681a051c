use std::collections::HashMap;

use enum_map::{EnumMap, enum_map};
use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coord::Location;
use crate::error::{ActionError, SetupError};
use crate::internal_error_message;
use crate::piece::{PieceId, PieceKind};
use crate::player::Player;
use crate::rules::{InvalidActionPolicy, Rules};
use crate::starter::{BoardSetter, PiecePositions, generate_starting_layout};


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ActionType {
    Move,
    Drop,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct PlayerAction {
    pub action_type: ActionType,
    pub player: Player,
    pub source: Option<Location>, // required for `Move`, ignored for `Drop`
    pub target: Location,
    pub piece_kind: PieceKind,
}

impl PlayerAction {
    pub fn movement(player: Player, piece_kind: PieceKind, source: Location, target: Location) -> Self {
        PlayerAction {
            action_type: ActionType::Move,
            player,
            source: Some(source),
            target,
            piece_kind,
        }
    }

    pub fn drop(player: Player, piece_kind: PieceKind, target: Location) -> Self {
        PlayerAction {
            action_type: ActionType::Drop,
            player,
            source: None,
            target,
            piece_kind,
        }
    }
}

// Relative to the active player. The active player does not change once the game is over.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    PlayerWin,
    PlayerLose,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PieceView {
    pub kind: PieceKind,
    pub owner: Player,
    // Move targets for live pieces, drop targets for captured pieces.
    pub legal_destinations: Vec<Location>,
    pub location: Option<Location>,
}

pub type Reserve = EnumMap<PieceKind, u8>;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub active_player: Player,
    pub captured_pieces: Vec<PieceView>,
    pub live_pieces: Vec<PieceView>,
    pub actions_remaining: u8,
    pub status: GameStatus,
}

impl GameState {
    pub fn piece_at(&self, location: Location) -> Option<&PieceView> {
        self.live_pieces.iter().find(|p| p.location == Some(location))
    }

    // Captured pieces available for dropping, counted by kind.
    pub fn reserves(&self) -> EnumMap<Player, Reserve> {
        let mut reserves = enum_map! { _ => enum_map! { _ => 0 } };
        for piece in &self.captured_pieces {
            reserves[piece.owner][piece.kind] += 1;
        }
        reserves
    }
}

#[derive(Clone, Copy, Debug)]
enum ValidAction {
    Move { from: Location, to: Location },
    Drop { piece: PieceId, to: Location },
}


#[derive(Clone, Debug)]
pub struct GameEngine {
    rules: Rules,
    starting_positions: PiecePositions,
    board: Board,
    active_player: Player,
    actions_remaining: u8,
    status: GameStatus,
    // Every action that changed the game, including consumed invalid ones.
    action_log: Vec<PlayerAction>,
    state: GameState,
}

impl GameEngine {
    pub fn new(rules: Rules) -> Result<Self, SetupError> {
        rules.verify().map_err(SetupError::InvalidRules)?;
        let positions = generate_starting_layout(&rules, &mut rand::rng());
        Self::from_positions(rules, positions)
    }

    pub fn from_positions(rules: Rules, positions: PiecePositions) -> Result<Self, SetupError> {
        rules.verify().map_err(SetupError::InvalidRules)?;
        let mut board = Board::new(&rules);
        BoardSetter::apply(&mut board, &positions)?;
        let mut engine = GameEngine {
            actions_remaining: rules.actions_per_turn,
            rules,
            starting_positions: positions,
            board,
            active_player: Player::One,
            status: GameStatus::Ongoing,
            action_log: Vec::new(),
            state: GameState {
                active_player: Player::One,
                captured_pieces: Vec::new(),
                live_pieces: Vec::new(),
                actions_remaining: 0,
                status: GameStatus::Ongoing,
            },
        };
        engine.recompute_status();
        Ok(engine)
    }

    pub fn rules(&self) -> &Rules { &self.rules }
    pub fn starting_positions(&self) -> &PiecePositions { &self.starting_positions }
    pub fn board(&self) -> &Board { &self.board }
    pub fn state(&self) -> &GameState { &self.state }
    pub fn status(&self) -> GameStatus { self.status }
    pub fn active_player(&self) -> Player { self.active_player }
    pub fn actions_remaining(&self) -> u8 { self.actions_remaining }
    pub fn action_log(&self) -> &[PlayerAction] { &self.action_log }
    pub fn actions_applied(&self) -> u32 { self.action_log.len() as u32 }

    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Ongoing => None,
            GameStatus::PlayerWin => Some(self.active_player),
            GameStatus::PlayerLose => Some(self.active_player.opponent()),
        }
    }

    // Resets to the layout this engine was created with.
    pub fn new_game(&mut self) {
        let mut board = Board::new(&self.rules);
        BoardSetter::apply(&mut board, &self.starting_positions)
            .unwrap_or_else(|err| panic!("{}", internal_error_message!("{err}")));
        self.board = board;
        self.active_player = Player::One;
        self.actions_remaining = self.rules.actions_per_turn;
        self.status = GameStatus::Ongoing;
        self.action_log.clear();
        info!("New game started");
        self.recompute_status();
    }

    pub fn apply_action(&mut self, action: PlayerAction) -> Result<&GameState, ActionError> {
        match self.validate(&action) {
            Ok(valid) => {
                match valid {
                    ValidAction::Move { from, to } => {
                        if let Some(captured) = self.board.move_piece(from, to) {
                            let kind = self.board.piece(captured).kind;
                            debug!("{:?} captured at {to}, holds {}", action.player, kind.name());
                        }
                    }
                    ValidAction::Drop { piece, to } => self.board.drop(to, piece, action.player),
                }
                debug!("Applied {action:?}");
                self.finish_action(action);
                Ok(&self.state)
            }
            Err(err) => {
                warn!("Rejected {action:?}: {err}");
                let consumes = match err {
                    ActionError::GameOver | ActionError::WrongTurnOrder => false,
                    _ => self.rules.invalid_action_policy == InvalidActionPolicy::ConsumeAction,
                };
                if consumes {
                    self.finish_action(action);
                }
                Err(err)
            }
        }
    }

    fn check_bounds(&self, location: Location) -> Result<(), ActionError> {
        if self.board.shape().contains(location) {
            Ok(())
        } else {
            Err(ActionError::OutOfBounds(location))
        }
    }

    fn validate(&self, action: &PlayerAction) -> Result<ValidAction, ActionError> {
        if self.status != GameStatus::Ongoing {
            return Err(ActionError::GameOver);
        }
        if action.player != self.active_player {
            return Err(ActionError::WrongTurnOrder);
        }
        self.check_bounds(action.target)?;
        match action.action_type {
            ActionType::Move => {
                let from = action.source.ok_or(ActionError::MissingSource)?;
                self.check_bounds(from)?;
                let piece = self.board.piece_at(from).ok_or(ActionError::PieceMissing)?;
                if piece.owner != action.player {
                    return Err(ActionError::NotOwnPiece);
                }
                if piece.kind != action.piece_kind {
                    return Err(ActionError::PieceKindMismatch);
                }
                if !self.board.movable_locations(piece.id).contains(&action.target) {
                    return Err(ActionError::ImpossibleTrajectory);
                }
                Ok(ValidAction::Move { from, to: action.target })
            }
            ActionType::Drop => {
                let piece = self
                    .board
                    .find_captured(action.player, action.piece_kind)
                    .ok_or(ActionError::DropPieceMissing)?;
                if self.board.piece_at(action.target).is_some() {
                    return Err(ActionError::DropBlocked);
                }
                if !self.board.is_legal_drop(action.target, piece, action.player) {
                    return Err(ActionError::DropAggression);
                }
                Ok(ValidAction::Drop { piece, to: action.target })
            }
        }
    }

    fn finish_action(&mut self, action: PlayerAction) {
        self.action_log.push(action);
        self.actions_remaining = self.actions_remaining.saturating_sub(1);
        self.recompute_status();
        if self.actions_remaining == 0 && self.status == GameStatus::Ongoing {
            self.active_player = self.active_player.opponent();
            self.actions_remaining = self.rules.actions_per_turn;
            debug!("Turn passes to {:?}", self.active_player);
        }
        self.publish();
    }

    // Opponent immobilization is checked first, so an action that traps both sides wins.
    // Own royals are only checked once the turn's budget is spent.
    pub fn recompute_status(&mut self) {
        let active = self.active_player;
        self.status = if self.board.opponent_royals_immobile(active) {
            GameStatus::PlayerWin
        } else if self.actions_remaining == 0 && self.board.royals_immobile(active) {
            GameStatus::PlayerLose
        } else {
            GameStatus::Ongoing
        };
        if let Some(winner) = self.winner() {
            info!("Game over: {winner:?} wins");
        }
        self.publish();
    }

    fn publish(&mut self) {
        self.state = self.snapshot();
    }

    fn snapshot(&self) -> GameState {
        let board = &self.board;
        let live_pieces = board
            .pieces()
            .iter()
            .filter(|p| p.is_live())
            .sorted_by_key(|p| p.location)
            .map(|p| PieceView {
                kind: p.kind,
                owner: p.owner,
                legal_destinations: board.movable_locations(p.id).into_iter().sorted().collect(),
                location: p.location,
            })
            .collect();
        let mut drop_cache = HashMap::new();
        let captured_pieces = board
            .pieces()
            .iter()
            .filter(|p| p.is_captured())
            .map(|p| PieceView {
                kind: p.kind,
                owner: p.owner,
                legal_destinations: drop_cache
                    .entry((p.owner, p.kind))
                    .or_insert_with(|| board.drop_locations(p.owner, p.kind))
                    .clone(),
                location: None,
            })
            .collect();
        GameState {
            active_player: self.active_player,
            captured_pieces,
            live_pieces,
            actions_remaining: self.actions_remaining,
            status: self.status,
        }
    }
}
