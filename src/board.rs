// Board is the single source of truth for pieces. Every piece ever placed lives in the `pieces`
// arena, indexed by its `PieceId`. Whether a piece is live or captured is derived from its
// `location`; the grid only mirrors the locations of live pieces.

use std::collections::HashSet;

use itertools::Itertools;

use crate::coord::{BoardShape, Location};
use crate::grid::{Grid, Square};
use crate::internal_error_message;
use crate::movement::SquareAccess;
use crate::piece::{Piece, PieceId, PieceKind};
use crate::player::Player;
use crate::rules::{DropSafety, Rules};


#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    pieces: Vec<Piece>,
    drop_safety: DropSafety,
}

impl Board {
    pub fn new(rules: &Rules) -> Self {
        Board {
            grid: Grid::new(rules.board_shape),
            pieces: Vec::new(),
            drop_safety: rules.drop_safety,
        }
    }

    pub fn shape(&self) -> BoardShape { self.grid.shape() }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn pieces(&self) -> &[Piece] { &self.pieces }
    pub fn piece(&self, id: PieceId) -> &Piece { &self.pieces[id.index()] }
    pub fn piece_at(&self, location: Location) -> Option<&Piece> {
        match self.grid.get(location) {
            Square::Occupied(&id) => Some(self.piece(id)),
            Square::Vacant | Square::OffBoard => None,
        }
    }

    pub fn live_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.owner == player && p.is_live())
    }
    pub fn royal_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.live_pieces(player).filter(|p| p.is_royal())
    }
    pub fn captured_pieces(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.owner == player && p.is_captured())
    }
    pub fn find_captured(&self, player: Player, kind: PieceKind) -> Option<PieceId> {
        self.captured_pieces(player).find(|p| p.kind == kind).map(|p| p.id)
    }

    // Used only while setting up the board: no legality checks.
    pub fn place_initial(&mut self, location: Location, piece: Piece, owner: Player) -> PieceId {
        assert!(self.grid[location].is_none(), "{}", internal_error_message!("{location} is taken"));
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(Piece {
            id,
            owner,
            location: Some(location),
            ..piece
        });
        self.grid[location] = Some(id);
        id
    }

    // Clears the grid cell only. The piece keeps its stale location until it is relocated,
    // so callers must follow up with `relocate` or `capture`.
    pub(crate) fn vacate(&mut self, location: Location) -> Option<PieceId> {
        self.grid[location].take()
    }

    pub(crate) fn relocate(&mut self, location: Location, id: PieceId) {
        self.pieces[id.index()].location = Some(location);
        self.grid[location] = Some(id);
    }

    // Occupant of `target` must be a mobile opponent piece.
    pub(crate) fn capture(&mut self, target: Location, capturing: PieceId) -> PieceId {
        let captured = self.grid[target]
            .unwrap_or_else(|| panic!("{}", internal_error_message!("nothing to capture at {target}")));
        let capturer_owner = self.piece(capturing).owner;
        assert!(self.can_capture(target), "{}", internal_error_message!("royal at {target}"));
        assert_ne!(self.piece(captured).owner, capturer_owner, "{}", internal_error_message!());
        self.relocate(target, capturing);
        let piece = &mut self.pieces[captured.index()];
        piece.location = None;
        piece.owner = capturer_owner;
        piece.kind = piece.kind.promoted();
        captured
    }

    pub(crate) fn drop(&mut self, target: Location, id: PieceId, owner: Player) {
        assert!(self.piece(id).is_captured(), "{}", internal_error_message!("{id:?} is live"));
        assert!(self.grid[target].is_none(), "{}", internal_error_message!("{target} is taken"));
        self.pieces[id.index()].owner = owner;
        self.relocate(target, id);
    }

    // Moves the piece from `from` to `to`, capturing the occupant if there is one.
    // Returns the captured piece. The move must be legal.
    pub fn move_piece(&mut self, from: Location, to: Location) -> Option<PieceId> {
        let id = self
            .vacate(from)
            .unwrap_or_else(|| panic!("{}", internal_error_message!("no piece at {from}")));
        let mover = *self.piece(id);
        if self.grid[to].is_some() && !mover.is_royal() && self.can_capture(to) {
            Some(self.capture(to, id))
        } else {
            assert!(self.grid[to].is_none(), "{}", internal_error_message!("{to} is taken"));
            self.relocate(to, id);
            None
        }
    }

    pub fn can_capture(&self, location: Location) -> bool {
        self.piece_at(location).is_some_and(|p| !p.is_royal())
    }

    // What `owner`'s pieces see on each square. Own pieces and opponent royals are absent.
    // `transparent` is treated as an empty square.
    fn access(
        &self, owner: Player, location: Location, transparent: Option<PieceId>,
    ) -> Option<SquareAccess> {
        match self.grid.get(location) {
            Square::OffBoard => None,
            Square::Vacant => Some(SquareAccess::Empty),
            Square::Occupied(&id) if Some(id) == transparent => Some(SquareAccess::Empty),
            Square::Occupied(&id) => {
                let piece = self.piece(id);
                if piece.owner == owner || piece.is_royal() {
                    None
                } else {
                    Some(SquareAccess::Opponent)
                }
            }
        }
    }

    fn raw_range(&self, piece: &Piece, transparent: Option<PieceId>) -> Vec<Location> {
        let Some(origin) = piece.location else {
            return Vec::new();
        };
        piece
            .movement()
            .range(origin, self.shape(), |loc| self.access(piece.owner, loc, transparent))
    }

    // Squares `player` could move to if they had the move, regardless of royal safety.
    // Computed as if `transparent` was not on the board, so that a royal cannot escape along
    // the line it is attacked on.
    pub fn attacked_locations(
        &self, player: Player, transparent: Option<PieceId>,
    ) -> HashSet<Location> {
        self.live_pieces(player)
            .flat_map(|piece| self.raw_range(piece, transparent))
            .collect()
    }

    pub fn movable_locations(&self, id: PieceId) -> Vec<Location> {
        let piece = self.piece(id);
        let range = self.raw_range(piece, None);
        if piece.is_royal() {
            let attacked = self.attacked_locations(piece.owner.opponent(), Some(id));
            range.into_iter().filter(|loc| !attacked.contains(loc)).collect()
        } else {
            range
        }
    }

    pub fn all_movable_locations(&self, player: Player) -> HashSet<Location> {
        self.live_pieces(player).flat_map(|piece| self.movable_locations(piece.id)).collect()
    }

    pub fn is_immobile(&self, royal: PieceId) -> bool {
        assert!(self.piece(royal).is_royal(), "{}", internal_error_message!());
        self.movable_locations(royal).is_empty()
    }

    // A player without royals is never considered immobilized.
    pub fn royals_immobile(&self, player: Player) -> bool {
        let royals = self.royal_pieces(player).map(|p| p.id).collect_vec();
        !royals.is_empty() && royals.into_iter().all(|id| self.is_immobile(id))
    }

    pub fn opponent_royals_immobile(&self, current_player: Player) -> bool {
        self.royals_immobile(current_player.opponent())
    }

    pub fn is_legal_drop(&self, target: Location, id: PieceId, owner: Player) -> bool {
        if !self.grid.get(target).is_vacant() {
            return false;
        }
        match self.drop_safety {
            DropSafety::Unrestricted => true,
            DropSafety::NoImmobilizingDrop => {
                let mut board = self.clone();
                board.drop(target, id, owner);
                !board.opponent_royals_immobile(owner)
            }
        }
    }

    pub fn drop_locations(&self, player: Player, kind: PieceKind) -> Vec<Location> {
        let Some(id) = self.find_captured(player, kind) else {
            return Vec::new();
        };
        self.shape()
            .locations()
            .filter(|&loc| self.is_legal_drop(loc, id, player))
            .collect()
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        for (idx, piece) in self.pieces.iter().enumerate() {
            if piece.id.index() != idx {
                return Err(format!("{:?} is stored at index {idx}", piece.id));
            }
            if let Some(loc) = piece.location {
                if self.grid[loc] != Some(piece.id) {
                    return Err(format!("{:?} claims {loc}, grid has {:?}", piece.id, self.grid[loc]));
                }
            }
        }
        for (loc, &id) in self.grid.occupied() {
            let piece = self.pieces.get(id.index()).ok_or_else(|| format!("unknown {id:?}"))?;
            if piece.location != Some(loc) {
                return Err(format!("grid has {id:?} at {loc}, piece is at {:?}", piece.location));
            }
        }
        if let Some(piece) = self.pieces.iter().find(|p| p.is_royal() && p.is_captured()) {
            return Err(format!("royal {:?} was captured", piece.id));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceFactory;

    fn sorted(locations: impl IntoIterator<Item = Location>) -> Vec<Location> {
        locations.into_iter().sorted().collect()
    }

    fn place(board: &mut Board, kind: PieceKind, owner: Player, row: u8, col: u8) -> PieceId {
        let loc = Location::new(row, col);
        board.place_initial(loc, PieceFactory::make(kind, loc, owner), owner)
    }

    fn empty_board(drop_safety: DropSafety) -> Board {
        Board::new(&Rules { drop_safety, ..Rules::classic() })
    }

    #[test]
    fn slider_range_stops_at_blocker() {
        let mut board = empty_board(DropSafety::Unrestricted);
        let pikachu = place(&mut board, PieceKind::Pikachu, Player::One, 3, 3);
        place(&mut board, PieceKind::Eevee, Player::Two, 5, 5);
        let range = board.movable_locations(pikachu);
        assert!(range.contains(&Location::new(4, 4)));
        assert!(range.contains(&Location::new(5, 5)));
        assert!(!range.contains(&Location::new(6, 6)));
    }

    #[test]
    fn mobile_pieces_cannot_target_royals() {
        let mut board = empty_board(DropSafety::Unrestricted);
        let turtwig = place(&mut board, PieceKind::Turtwig, Player::One, 4, 0);
        place(&mut board, PieceKind::Latios, Player::Two, 4, 3);
        assert_eq!(sorted(board.movable_locations(turtwig)).len(), 7 + 2);
        assert!(!board.movable_locations(turtwig).contains(&Location::new(4, 3)));
        assert!(!board.can_capture(Location::new(4, 3)));
    }

    #[test]
    fn royal_avoids_attacked_squares() {
        let mut board = empty_board(DropSafety::Unrestricted);
        let latios = place(&mut board, PieceKind::Latios, Player::One, 7, 4);
        // Attacks the whole row 6.
        place(&mut board, PieceKind::Turtwig, Player::Two, 6, 0);
        assert_eq!(sorted(board.movable_locations(latios)), vec![
            Location::new(7, 3),
            Location::new(7, 5)
        ]);
        // Sliding along the line of attack does not help.
        place(&mut board, PieceKind::Turtwig, Player::Two, 7, 0);
        assert!(board.is_immobile(latios));
        assert!(board.opponent_royals_immobile(Player::Two));
        assert!(!board.opponent_royals_immobile(Player::One));
    }

    #[test]
    fn movable_locations_union() {
        let mut board = empty_board(DropSafety::Unrestricted);
        place(&mut board, PieceKind::Eevee, Player::One, 6, 0);
        place(&mut board, PieceKind::Eevee, Player::One, 6, 1);
        place(&mut board, PieceKind::Latias, Player::One, 7, 7);
        place(&mut board, PieceKind::EeveeShiny, Player::Two, 5, 1);
        assert_eq!(sorted(board.all_movable_locations(Player::One)), vec![
            Location::new(5, 0),
            Location::new(5, 1),
            Location::new(6, 6),
        ]);
        assert_eq!(sorted(board.all_movable_locations(Player::Two)), vec![Location::new(6, 1)]);
    }

    #[test]
    fn surrounded_royal_is_immobile() {
        let mut board = empty_board(DropSafety::Unrestricted);
        let latias = place(&mut board, PieceKind::Latias, Player::Two, 0, 0);
        let blocker = place(&mut board, PieceKind::Eevee, Player::One, 1, 1);
        assert!(board.is_immobile(latias));
        assert!(board.royals_immobile(Player::Two));

        // A second royal with room to move keeps the player alive.
        let latios = place(&mut board, PieceKind::Latios, Player::Two, 0, 7);
        assert!(!board.is_immobile(latios));
        assert!(!board.royals_immobile(Player::Two));
        assert!(board.piece(blocker).is_live());
    }

    #[test]
    fn capture_flips_owner_and_kind() {
        let mut board = empty_board(DropSafety::Unrestricted);
        place(&mut board, PieceKind::Eevee, Player::One, 4, 4);
        let victim = place(&mut board, PieceKind::EeveeShiny, Player::Two, 3, 4);
        let captured = board.move_piece(Location::new(4, 4), Location::new(3, 4));
        assert_eq!(captured, Some(victim));
        let piece = board.piece(victim);
        assert_eq!(piece.owner, Player::One);
        assert_eq!(piece.kind, PieceKind::Eevee);
        assert_eq!(piece.location, None);
        assert_eq!(board.find_captured(Player::One, PieceKind::Eevee), Some(victim));
        assert_eq!(board.captured_pieces(Player::Two).count(), 0);
        board.check_invariants().unwrap();
    }

    #[test]
    fn turncoat_regains_kind_after_two_captures() {
        let mut board = empty_board(DropSafety::Unrestricted);
        let one = place(&mut board, PieceKind::Turtwig, Player::One, 7, 0);
        let two = place(&mut board, PieceKind::Turtwig, Player::Two, 0, 7);
        let eevee = place(&mut board, PieceKind::Eevee, Player::One, 7, 7);

        board.move_piece(Location::new(0, 7), Location::new(7, 7));
        assert_eq!(board.piece(eevee).kind, PieceKind::EeveeShiny);
        assert_eq!(board.piece(eevee).owner, Player::Two);

        board.drop(Location::new(3, 3), eevee, Player::Two);
        board.move_piece(Location::new(7, 0), Location::new(3, 0));
        board.move_piece(Location::new(3, 0), Location::new(3, 3));
        assert_eq!(board.piece(eevee).kind, PieceKind::Eevee);
        assert_eq!(board.piece(eevee).owner, Player::One);
        assert!(board.piece(one).is_live());
        assert!(board.piece(two).is_live());
        board.check_invariants().unwrap();
    }

    #[test]
    fn step_movers_never_self_capture() {
        let mut board = empty_board(DropSafety::Unrestricted);
        let eevee = place(&mut board, PieceKind::Eevee, Player::One, 5, 2);
        place(&mut board, PieceKind::Pikachu, Player::One, 4, 2);
        assert!(board.movable_locations(eevee).is_empty());
        let latios = place(&mut board, PieceKind::Latios, Player::One, 0, 0);
        place(&mut board, PieceKind::Turtwig, Player::One, 0, 1);
        assert_eq!(board.movable_locations(latios), vec![Location::new(1, 0)]);
    }

    #[test]
    fn drop_safety_forbids_immobilizing_drop() {
        for drop_safety in [DropSafety::Unrestricted, DropSafety::NoImmobilizingDrop] {
            let mut board = empty_board(drop_safety);
            // The royal's only escape is (1,0).
            place(&mut board, PieceKind::Latios, Player::Two, 0, 0);
            place(&mut board, PieceKind::Eevee, Player::One, 0, 1);
            place(&mut board, PieceKind::Turtwig, Player::One, 4, 7);
            let victim = place(&mut board, PieceKind::EeveeShiny, Player::Two, 4, 4);
            board.move_piece(Location::new(4, 7), Location::new(4, 4));
            assert_eq!(board.find_captured(Player::One, PieceKind::Eevee), Some(victim));

            let unrestricted = drop_safety == DropSafety::Unrestricted;
            // Blocks the escape square.
            assert_eq!(board.is_legal_drop(Location::new(1, 0), victim, Player::One), unrestricted);
            // Attacks the escape square.
            assert_eq!(board.is_legal_drop(Location::new(2, 0), victim, Player::One), unrestricted);
            assert!(board.is_legal_drop(Location::new(5, 5), victim, Player::One));
            assert!(!board.is_legal_drop(Location::new(4, 4), victim, Player::One));
            let expected = if unrestricted { 64 - 3 } else { 64 - 3 - 2 };
            assert_eq!(board.drop_locations(Player::One, PieceKind::Eevee).len(), expected);
            board.check_invariants().unwrap();
        }
    }

    #[test]
    fn drop_locations_exclude_taken_squares() {
        let mut board = empty_board(DropSafety::Unrestricted);
        place(&mut board, PieceKind::Pikachu, Player::One, 0, 0);
        assert!(board.drop_locations(Player::One, PieceKind::Pikachu).is_empty());
        place(&mut board, PieceKind::Turtwig, Player::Two, 1, 1);
        let victim = place(&mut board, PieceKind::Turtwig, Player::Two, 2, 2);
        board.move_piece(Location::new(0, 0), Location::new(1, 1));
        board.move_piece(Location::new(1, 1), Location::new(2, 2));
        assert_eq!(board.piece(victim).owner, Player::One);
        let drops = board.drop_locations(Player::One, PieceKind::Turtwig);
        assert_eq!(drops.len(), 64 - 1);
        assert!(!drops.contains(&Location::new(2, 2)));
    }
}
