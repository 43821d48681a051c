use std::fmt;

use crate::coord::Location;


#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActionError {
    GameOver,
    WrongTurnOrder,
    OutOfBounds(Location),
    MissingSource,
    PieceMissing,
    PieceKindMismatch,
    NotOwnPiece,
    ImpossibleTrajectory,
    DropPieceMissing,
    DropBlocked,
    DropAggression,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ActionError::*;
        match self {
            GameOver => write!(f, "the game is over"),
            WrongTurnOrder => write!(f, "it is not this player's turn"),
            OutOfBounds(loc) => write!(f, "square {loc} is outside the board"),
            MissingSource => write!(f, "a move requires a source square"),
            PieceMissing => write!(f, "there is no piece on the source square"),
            PieceKindMismatch => write!(f, "the piece on the source square is of another kind"),
            NotOwnPiece => write!(f, "the piece belongs to the opponent"),
            ImpossibleTrajectory => write!(f, "the piece cannot reach the target square"),
            DropPieceMissing => write!(f, "no captured piece of this kind is available"),
            DropBlocked => write!(f, "the drop square is occupied"),
            DropAggression => write!(f, "the drop would leave the opponent royals with no escape"),
        }
    }
}

impl std::error::Error for ActionError {}


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SetupError {
    InvalidRules(String),
    OutOfBounds(Location),
    SquareTaken(Location),
    MissingRoyal,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::InvalidRules(message) => write!(f, "invalid rules: {message}"),
            SetupError::OutOfBounds(loc) => write!(f, "square {loc} is outside the board"),
            SetupError::SquareTaken(loc) => write!(f, "square {loc} is listed twice"),
            SetupError::MissingRoyal => write!(f, "each player needs at least one royal piece"),
        }
    }
}

impl std::error::Error for SetupError {}


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SyncError {
    // The peer sent an action numbered differently from what we expect next.
    Desync { expected: u32, received: u32 },
    // The peer tried to act on behalf of the local player.
    ForeignPlayer,
    UnexpectedSetup,
    Setup(SetupError),
    Action(ActionError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Desync { expected, received } => {
                write!(f, "out of sync: expected action #{expected}, received #{received}")
            }
            SyncError::ForeignPlayer => write!(f, "peer acted on behalf of the local player"),
            SyncError::UnexpectedSetup => write!(f, "board setup received mid-game"),
            SyncError::Setup(err) => write!(f, "bad board setup from peer: {err}"),
            SyncError::Action(err) => write!(f, "peer action rejected: {err}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<SetupError> for SyncError {
    fn from(err: SetupError) -> Self { SyncError::Setup(err) }
}

impl From<ActionError> for SyncError {
    fn from(err: ActionError) -> Self { SyncError::Action(err) }
}
