use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};


pub const DEFAULT_NUM_ROWS: u8 = 8;
pub const DEFAULT_NUM_COLS: u8 = 8;


// A square on the board. Rows grow downwards: row 0 is the top row, where player Two starts.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    row: u8, // 0-based
    col: u8, // 0-based
}

impl Location {
    pub const fn new(row: u8, col: u8) -> Self { Self { row, col } }
    pub const fn row(self) -> u8 { self.row }
    pub const fn col(self) -> u8 { self.col }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({},{})", self.row, self.col)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BoardShape {
    pub num_rows: u8,
    pub num_cols: u8,
}

impl BoardShape {
    pub fn standard() -> Self {
        BoardShape {
            num_rows: DEFAULT_NUM_ROWS,
            num_cols: DEFAULT_NUM_COLS,
        }
    }

    pub fn contains(self, location: Location) -> bool {
        location.row < self.num_rows && location.col < self.num_cols
    }

    // Returns `None` if the resulting square is off the board. This is the only way to derive
    // a new location from an existing one, so stepping never yields out-of-bounds squares.
    pub fn offset(self, location: Location, (d_row, d_col): (i8, i8)) -> Option<Location> {
        let row = location.row as i16 + d_row as i16;
        let col = location.col as i16 + d_col as i16;
        if row < 0 || col < 0 || row >= self.num_rows as i16 || col >= self.num_cols as i16 {
            return None;
        }
        Some(Location::new(row as u8, col as u8))
    }

    pub fn mirror_row(self, location: Location) -> Location {
        Location::new(self.num_rows - location.row - 1, location.col)
    }

    pub fn rows(self) -> impl DoubleEndedIterator<Item = u8> + Clone { 0..self.num_rows }
    pub fn cols(self) -> impl DoubleEndedIterator<Item = u8> + Clone { 0..self.num_cols }
    pub fn locations(self) -> impl Iterator<Item = Location> {
        self.rows().cartesian_product(self.cols()).map(|(row, col)| Location::new(row, col))
    }
}
