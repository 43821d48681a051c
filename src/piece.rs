use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::coord::Location;
use crate::movement::{DIAGONAL, FORWARD_DOWN, FORWARD_UP, MovementRule, ORTHOGONAL};
use crate::player::Player;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl PieceId {
    // Placeholder until the board assigns a real id.
    pub fn tmp() -> Self { PieceId(u32::MAX) }
    pub fn index(self) -> usize { self.0 as usize }
}

#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
pub enum PieceKind {
    Eevee,
    EeveeShiny,
    Pikachu,
    Turtwig,
    Latios,
    Latias,
}

impl PieceKind {
    pub fn is_royal(self) -> bool {
        use PieceKind::*;
        match self {
            Eevee | EeveeShiny | Pikachu | Turtwig => false,
            Latios | Latias => true,
        }
    }

    // The kind a piece turns into when captured. Forward movers switch direction together with
    // their owner; sliders are symmetric so they stay as they are.
    pub fn promoted(self) -> Self {
        use PieceKind::*;
        match self {
            Eevee => EeveeShiny,
            EeveeShiny => Eevee,
            Pikachu | Turtwig | Latios | Latias => self,
        }
    }

    pub fn movement(self) -> MovementRule {
        use PieceKind::*;
        match self {
            Eevee => MovementRule::step(&FORWARD_UP),
            EeveeShiny => MovementRule::step(&FORWARD_DOWN),
            Pikachu => MovementRule::slide(&DIAGONAL),
            Turtwig => MovementRule::slide(&ORTHOGONAL),
            Latios => MovementRule::royal_step(&ORTHOGONAL),
            Latias => MovementRule::royal_step(&DIAGONAL),
        }
    }

    // The forward-moving kind that advances towards the opponent of `owner`.
    pub fn forward_for(owner: Player) -> Self {
        if owner.direction_forward() == FORWARD_UP[0].0 {
            PieceKind::Eevee
        } else {
            PieceKind::EeveeShiny
        }
    }

    pub fn name(self) -> &'static str {
        use PieceKind::*;
        match self {
            Eevee => "Eevee",
            EeveeShiny => "Eevee-shiny",
            Pikachu => "Pikachu",
            Turtwig => "Turtwig",
            Latios => "Latios",
            Latias => "Latias",
        }
    }

    pub fn to_ascii(self) -> char {
        use PieceKind::*;
        match self {
            Eevee => 'E',
            EeveeShiny => 'S',
            Pikachu => 'P',
            Turtwig => 'T',
            Latios => 'O',
            Latias => 'A',
        }
    }

    pub fn from_ascii(ch: char) -> Option<Self> {
        use PieceKind::*;
        match ch.to_ascii_uppercase() {
            'E' => Some(Eevee),
            'S' => Some(EeveeShiny),
            'P' => Some(Pikachu),
            'T' => Some(Turtwig),
            'O' => Some(Latios),
            'A' => Some(Latias),
            _ => None,
        }
    }
}

// Uppercase for player One, lowercase for player Two.
pub fn piece_to_ascii(kind: PieceKind, owner: Player) -> char {
    let ch = kind.to_ascii();
    match owner {
        Player::One => ch,
        Player::Two => ch.to_ascii_lowercase(),
    }
}

pub fn piece_from_ascii(ch: char) -> Option<(PieceKind, Player)> {
    let kind = PieceKind::from_ascii(ch)?;
    let owner = if ch.is_ascii_uppercase() { Player::One } else { Player::Two };
    Some((kind, owner))
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, new, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: Player,
    // `None` iff the piece is captured and waits in its owner's pool.
    pub location: Option<Location>,
}

impl Piece {
    pub fn is_royal(&self) -> bool { self.kind.is_royal() }
    pub fn is_live(&self) -> bool { self.location.is_some() }
    pub fn is_captured(&self) -> bool { self.location.is_none() }
    pub fn movement(&self) -> MovementRule { self.kind.movement() }
}


pub struct PieceFactory;

impl PieceFactory {
    // The board assigns the real id when the piece is placed.
    pub fn make(kind: PieceKind, location: Location, owner: Player) -> Piece {
        Piece::new(PieceId::tmp(), kind, owner, Some(location))
    }
}
