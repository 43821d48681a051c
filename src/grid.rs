use std::{fmt, ops};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::coord::{BoardShape, Location};
use crate::piece::PieceId;


pub type Grid = SquareGrid<PieceId>;

// Contents of a square as seen through `SquareGrid::get`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Square<T> {
    Occupied(T),
    Vacant,
    OffBoard,
}

impl<T> Square<T> {
    pub fn is_vacant(&self) -> bool { matches!(self, Square::Vacant) }
}

// At most one item per square. Indexing by an off-board location panics; use `get` to probe.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SquareGrid<T: Clone> {
    shape: BoardShape,
    cells: Array2<Option<T>>,
}

impl<T: Clone> SquareGrid<T> {
    pub fn new(shape: BoardShape) -> Self {
        let dims = (shape.num_rows as usize, shape.num_cols as usize);
        SquareGrid { shape, cells: Array2::from_elem(dims, None) }
    }

    pub fn shape(&self) -> BoardShape { self.shape }

    pub fn get(&self, location: Location) -> Square<&T> {
        match self.cell(location) {
            None => Square::OffBoard,
            Some(None) => Square::Vacant,
            Some(Some(item)) => Square::Occupied(item),
        }
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Location, &T)> {
        self.cells.indexed_iter().filter_map(|((row, col), item)| {
            item.as_ref().map(|item| (Location::new(row as u8, col as u8), item))
        })
    }

    fn cell(&self, location: Location) -> Option<&Option<T>> {
        self.shape
            .contains(location)
            .then(|| &self.cells[[location.row() as usize, location.col() as usize]])
    }

    #[track_caller]
    fn off_board(&self, location: Location) -> ! {
        let BoardShape { num_rows, num_cols } = self.shape;
        panic!("{location} is off the {num_rows}x{num_cols} board")
    }
}

impl<T: Clone> ops::Index<Location> for SquareGrid<T> {
    type Output = Option<T>;
    #[track_caller]
    fn index(&self, location: Location) -> &Self::Output {
        match self.cell(location) {
            Some(cell) => cell,
            None => self.off_board(location),
        }
    }
}

impl<T: Clone> ops::IndexMut<Location> for SquareGrid<T> {
    #[track_caller]
    fn index_mut(&mut self, location: Location) -> &mut Self::Output {
        if !self.shape.contains(location) {
            self.off_board(location);
        }
        &mut self.cells[[location.row() as usize, location.col() as usize]]
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for SquareGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.occupied()).finish()
    }
}
