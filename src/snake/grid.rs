//! Grid geometry: cells, dimensions and neighbor enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row/column offsets of the four edge-sharing neighbors (up, down, left, right)
pub const ORTHOGONAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Row/column offsets of the four corner-sharing neighbors
pub const DIAGONAL_OFFSETS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// A grid position, 0-indexed from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a signed offset, returning `None` when it would leave the first quadrant
    pub fn offset(self, dr: isize, dc: isize) -> Option<Cell> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Cell { row, col })
    }

    /// True if the two cells share an edge
    pub fn is_orthogonal_to(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// True if the two cells share only a corner
    pub fn is_diagonal_to(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) == 1 && self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Dimensions of a rectangular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Row-major index of an in-bounds cell
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    /// Cells of one row, left to right
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = Cell> {
        (0..self.cols).map(move |col| Cell::new(row, col))
    }

    /// Cells of one column, top to bottom
    pub fn col_cells(&self, col: usize) -> impl Iterator<Item = Cell> {
        (0..self.rows).map(move |row| Cell::new(row, col))
    }

    fn neighbors_by(
        &self,
        cell: Cell,
        offsets: &'static [(isize, isize); 4],
    ) -> impl Iterator<Item = Cell> + '_ {
        offsets
            .iter()
            .filter_map(move |&(dr, dc)| cell.offset(dr, dc))
            .filter(move |n| self.contains(*n))
    }

    /// In-bounds cells sharing an edge with `cell`
    pub fn orthogonal_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.neighbors_by(cell, &ORTHOGONAL_OFFSETS)
    }

    /// In-bounds cells sharing only a corner with `cell`
    pub fn diagonal_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.neighbors_by(cell, &DIAGONAL_OFFSETS)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
